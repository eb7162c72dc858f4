//! Core library for exterior ballistic trajectory computation.
//!
//! This crate provides:
//! - Drag-curve evaluation over tabulated `(Mach, CD)` models
//! - An ICAO atmosphere with altitude lapse and humidity correction
//! - Trajectory integration (Euler / RK4 / velocity Verlet) with
//!   sight-line, Mach, apex, and range event detection
//! - Zero-angle and maximum-range solvers
//!
//! Canonical units throughout: feet, feet per second, radians, degrees
//! Fahrenheit, inches of mercury, grains, and foot-pounds. Unit conversion
//! is the caller's concern.
//!
//! A shot is described with [`Shot`] and flattened into a [`ShotProps`]
//! snapshot; [`integrate`] produces a [`HitResult`] of
//! [`TrajectoryData`] samples, and [`find_zero_angle`] /
//! [`find_max_range`] invert the integrator for zeroing problems.

pub mod atmosphere;
pub mod config;
pub mod drag;
pub mod engine;
pub mod error;
pub mod interpolate;
pub mod shot;
pub mod solver;
pub mod tables;
pub mod trajectory;
pub mod vector;
pub mod wind;

pub use atmosphere::Atmosphere;
pub use config::{APEX_IS_MAX_RANGE_RADIANS, EngineConfig};
pub use drag::{CurveMethod, DRAG_CONST, DragCurve, DragDataPoint};
pub use engine::{IntegrationMethod, integrate};
pub use error::{Error, RangeCause, Result};
pub use shot::{Ammo, DragModel, Shot, ShotProps, Weapon};
pub use solver::{find_max_range, find_zero_angle};
pub use tables::{TABLE_G1, TABLE_G7};
pub use trajectory::{HitResult, SampleKey, TrajFlag, TrajectoryData};
pub use vector::Vector3;
pub use wind::{WindSegment, WindSock};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
