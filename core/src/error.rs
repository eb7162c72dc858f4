//! Error types for trajectory computation.

use thiserror::Error;

/// Result type alias using our error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Terminal errors: the call produced no usable result.
///
/// Early termination of an integration is *not* an error — the partial
/// trajectory plus a [`RangeCause`] is returned inside
/// [`HitResult`](crate::trajectory::HitResult) instead.
#[derive(Debug, Error)]
pub enum Error {
	/// Drag table failed validation.
	#[error("invalid drag table: {reason}")]
	InvalidDragTable { reason: String },

	/// Malformed scalar input (non-finite value, BC ≤ 0, bad range bounds).
	#[error("invalid input: {message}")]
	InvalidInput { message: String },

	/// Zero finding hit its iteration cap or the target is unreachable.
	#[error("zero finding failed at elevation {elevation} rad (miss {miss} ft)")]
	ZeroFinding { elevation: f64, miss: f64 },

	/// A keyed trajectory lookup fell outside the sampled range.
	#[error("no trajectory sample satisfies {key} = {value}")]
	NotFound { key: &'static str, value: f64 },
}

impl Error {
	/// Create a drag-table validation error.
	pub fn drag_table(reason: impl Into<String>) -> Self {
		Self::InvalidDragTable {
			reason: reason.into(),
		}
	}

	/// Create a malformed-input error.
	pub fn input(message: impl Into<String>) -> Self {
		Self::InvalidInput {
			message: message.into(),
		}
	}
}

/// Reason an integration stopped before reaching the requested range.
///
/// Carried alongside the partial trajectory; callers decide whether a
/// partial result is good enough for their purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeCause {
	/// Velocity dropped below the configured minimum.
	#[error("velocity dropped below the configured minimum")]
	MinimumVelocityReached,

	/// Projectile fell below the configured maximum drop.
	#[error("projectile fell below the configured maximum drop")]
	MaximumDropReached,

	/// Projectile descended below the configured minimum altitude.
	#[error("projectile descended below the configured minimum altitude")]
	MinimumAltitudeReached,

	/// Step budget exhausted before the requested range was reached.
	#[error("step budget exhausted before the requested range")]
	DidNotConverge,
}
