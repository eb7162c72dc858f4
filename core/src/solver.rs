//! Zero-angle and maximum-range solvers.
//!
//! Both invert the integrator: the zero finder iterates a secant-like
//! update on barrel elevation until the trajectory passes through the
//! target on the sight line, and the max-range search brackets the
//! elevation that maximizes the distance at which the trajectory comes
//! back down through the sight line.

use std::f64::consts::FRAC_PI_2;

use crate::config::{APEX_IS_MAX_RANGE_RADIANS, EngineConfig};
use crate::engine::{GRAVITY_FPS2, IntegrationMethod, integrate};
use crate::error::{Error, Result};
use crate::shot::ShotProps;
use crate::trajectory::TrajFlag;

/// Golden ratio conjugate for the section search.
const INV_PHI: f64 = 0.618_033_988_749_894_8;

/// Elevation margin keeping the search bracket away from its endpoints.
const BRACKET_MARGIN_RAD: f64 = 1e-6;

/// Find the barrel elevation that zeroes the shot at `target_distance`
/// feet along the sight line.
///
/// Iterates `E ← E − h/x` on the height above the sight line at the
/// target, to within the configured zero-finding accuracy. A sight line
/// within [`APEX_IS_MAX_RANGE_RADIANS`] of vertical is answered with the
/// apex check instead.
///
/// # Errors
///
/// [`Error::ZeroFinding`] when the target is beyond the shot's maximum
/// range or the iteration cap is reached; [`Error::InvalidInput`] for a
/// negative or non-finite target.
pub fn find_zero_angle(
	props: &ShotProps,
	target_distance: f64,
	method: IntegrationMethod,
	config: &EngineConfig,
) -> Result<f64> {
	config.validate()?;
	if !target_distance.is_finite() || target_distance < 0.0 {
		return Err(Error::input(format!(
			"target distance must be finite and non-negative, got {target_distance}"
		)));
	}
	if target_distance == 0.0 {
		return Ok(props.look_angle);
	}

	let look = props.look_angle;
	if FRAC_PI_2 - look < APEX_IS_MAX_RANGE_RADIANS {
		// Shooting straight up: the only reachable points lie at or below
		// the apex of a vertical shot.
		let apex = apex_slant_distance(props, FRAC_PI_2, method, config)?;
		if apex >= target_distance {
			return Ok(look);
		}
		return Err(Error::ZeroFinding {
			elevation: FRAC_PI_2,
			miss: target_distance - apex,
		});
	}

	let look_cos = look.cos();
	let horizontal = target_distance * look_cos;
	let mut elevation = look;
	let mut best_elevation = look;
	let mut best_miss = f64::INFINITY;
	let mut max_range_hint: Option<(f64, f64)> = None;

	for _ in 0..config.max_zero_iterations {
		let trial = props.with_elevation(elevation);
		let hit = integrate(&trial, horizontal, horizontal, TrajFlag::NONE, 0.0, method, config)?;
		let last = hit
			.trajectory
			.last()
			.copied()
			.ok_or_else(|| Error::ZeroFinding {
				elevation,
				miss: f64::INFINITY,
			})?;

		if hit.incomplete.is_some() || last.distance < horizontal - 1e-6 {
			// Fell short of the target. Unreachable targets are diagnosed
			// via the max-range search; reachable ones pull the elevation
			// toward the max-range elevation and retry.
			let (max_distance, max_elevation) = match max_range_hint {
				Some(pair) => pair,
				None => {
					let pair = find_max_range(props, method, config)?;
					max_range_hint = Some(pair);
					pair
				},
			};
			if max_distance < target_distance {
				return Err(Error::ZeroFinding {
					elevation: max_elevation,
					miss: target_distance - max_distance,
				});
			}
			elevation = 0.5 * (elevation + max_elevation);
			continue;
		}

		// Height above the sight line at the target.
		let miss = last.slant_height / look_cos;
		if miss.abs() < config.zero_finding_accuracy {
			return Ok(elevation);
		}
		if miss.abs() < best_miss {
			best_miss = miss.abs();
			best_elevation = elevation;
		} else {
			// Diverging: damp back toward the best elevation seen.
			elevation = 0.5 * (elevation + best_elevation);
			continue;
		}
		elevation -= miss / last.distance;
		// A wild secant step (enormous miss over a short distance) must not
		// carry the barrel past vertical or far below the sight line.
		elevation = elevation.clamp(
			-FRAC_PI_2 + BRACKET_MARGIN_RAD,
			FRAC_PI_2 - BRACKET_MARGIN_RAD,
		);
	}

	Err(Error::ZeroFinding {
		elevation: best_elevation,
		miss: best_miss,
	})
}

/// Find the elevation that maximizes the distance along the sight line at
/// which the trajectory crosses back down through it.
///
/// Returns `(slant_distance_ft, elevation_rad)`. Golden-section search
/// over elevations between the look angle and vertical.
///
/// # Errors
///
/// Propagates integration input errors.
pub fn find_max_range(
	props: &ShotProps,
	method: IntegrationMethod,
	config: &EngineConfig,
) -> Result<(f64, f64)> {
	config.validate()?;
	let look = props.look_angle;
	let lo = look + BRACKET_MARGIN_RAD;
	let hi = FRAC_PI_2 - BRACKET_MARGIN_RAD;
	if hi <= lo {
		// Vertical sight line: range along it is the apex height.
		let apex = apex_slant_distance(props, FRAC_PI_2, method, config)?;
		return Ok((apex, FRAC_PI_2));
	}

	let mut a = lo;
	let mut b = hi;
	let mut c = b - INV_PHI * (b - a);
	let mut d = a + INV_PHI * (b - a);
	let mut fc = zero_down_distance(props, c, method, config)?;
	let mut fd = zero_down_distance(props, d, method, config)?;

	for _ in 0..config.max_range_iterations {
		if fc > fd {
			b = d;
			d = c;
			fd = fc;
			c = b - INV_PHI * (b - a);
			fc = zero_down_distance(props, c, method, config)?;
		} else {
			a = c;
			c = d;
			fc = fd;
			d = a + INV_PHI * (b - a);
			fd = zero_down_distance(props, d, method, config)?;
		}
		if b - a < 1e-10 {
			break;
		}
	}

	Ok(if fc > fd { (fc, c) } else { (fd, d) })
}

/// Distance along the sight line at which the trajectory at `elevation`
/// crosses back down through it; falls back to the terminal slant distance
/// when no crossing occurs before termination.
fn zero_down_distance(
	props: &ShotProps,
	elevation: f64,
	method: IntegrationMethod,
	config: &EngineConfig,
) -> Result<f64> {
	let trial = props.with_elevation(elevation);
	let cap = vacuum_range_cap(props.muzzle_velocity);
	let hit = integrate(&trial, cap, cap / 10.0, TrajFlag::ZERO_DOWN, 0.0, method, config)?;
	if let Some(sample) = hit.flag(TrajFlag::ZERO_DOWN) {
		return Ok(sample.slant_distance);
	}
	Ok(hit.trajectory.last().map_or(0.0, |s| s.slant_distance))
}

/// Time spacing of the dense samples backing the apex probe, seconds.
const APEX_PROBE_TIME_STEP_S: f64 = 0.05;

/// Slant distance of the apex of a shot fired at `elevation`.
///
/// The velocity floor is lifted for the probe (a vertical shot slows
/// through any positive floor on its way up), and dense time samples back
/// the apex event: for a shot straight along the sight line the apex-rate
/// sign test degenerates, so the maximum over the samples stands in.
fn apex_slant_distance(
	props: &ShotProps,
	elevation: f64,
	method: IntegrationMethod,
	config: &EngineConfig,
) -> Result<f64> {
	let mut probe_config = *config;
	probe_config.minimum_velocity = 0.0;
	let trial = props.with_elevation(elevation);
	let cap = vacuum_range_cap(props.muzzle_velocity);
	let hit = integrate(
		&trial,
		cap,
		cap / 10.0,
		TrajFlag::APEX,
		APEX_PROBE_TIME_STEP_S,
		method,
		&probe_config,
	)?;
	if let Some(sample) = hit.flag(TrajFlag::APEX) {
		return Ok(sample.slant_distance);
	}
	Ok(hit
		.trajectory
		.iter()
		.map(|s| s.slant_distance)
		.fold(0.0, f64::max))
}

/// Horizontal distance no drag-free trajectory can exceed; a safe
/// integration cap for the bracketing searches.
fn vacuum_range_cap(muzzle_velocity: f64) -> f64 {
	muzzle_velocity * muzzle_velocity / -GRAVITY_FPS2 + 100.0
}
