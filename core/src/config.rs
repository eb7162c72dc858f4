//! Engine configuration.
//!
//! Every numerical tunable is an explicit argument to the integrate/solver
//! calls, grouped here; nothing reads process-global state. Defaults live
//! next to the struct.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sight lines closer than this to vertical are treated as "straight up":
/// the zero solver answers with the apex instead of a sight-line crossing.
pub const APEX_IS_MAX_RANGE_RADIANS: f64 = 1e-2;

/// Tunables for integration and the outer solvers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
	/// Integration stops when velocity drops below this, fps.
	pub minimum_velocity: f64,

	/// Integration stops when height drops below this, feet.
	pub maximum_drop: f64,

	/// Optional altitude floor, feet; `None` never terminates on altitude.
	pub minimum_altitude: Option<f64>,

	/// Scales the base calculation step. Larger is coarser and faster.
	pub step_multiplier: f64,

	/// Zero-finding convergence tolerance on height at the target, feet.
	pub zero_finding_accuracy: f64,

	/// Iteration cap for the zero finder.
	pub max_zero_iterations: usize,

	/// Iteration cap for the max-range search.
	pub max_range_iterations: usize,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			minimum_velocity: 50.0,
			maximum_drop: -15000.0,
			minimum_altitude: None,
			step_multiplier: 1.0,
			zero_finding_accuracy: 5e-6,
			max_zero_iterations: 50,
			max_range_iterations: 40,
		}
	}
}

impl EngineConfig {
	/// Check that every tunable is finite and usable.
	///
	/// # Errors
	///
	/// [`Error::InvalidInput`] naming the offending field.
	pub fn validate(&self) -> Result<()> {
		if !self.minimum_velocity.is_finite() || self.minimum_velocity < 0.0 {
			return Err(Error::input(format!(
				"minimum_velocity must be finite and non-negative, got {}",
				self.minimum_velocity
			)));
		}
		if !self.maximum_drop.is_finite() {
			return Err(Error::input("maximum_drop must be finite"));
		}
		if let Some(floor) = self.minimum_altitude {
			if !floor.is_finite() {
				return Err(Error::input("minimum_altitude must be finite when set"));
			}
		}
		if !self.step_multiplier.is_finite() || self.step_multiplier <= 0.0 {
			return Err(Error::input(format!(
				"step_multiplier must be finite and positive, got {}",
				self.step_multiplier
			)));
		}
		if !self.zero_finding_accuracy.is_finite() || self.zero_finding_accuracy <= 0.0 {
			return Err(Error::input("zero_finding_accuracy must be finite and positive"));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = EngineConfig::default();
		assert!((config.minimum_velocity - 50.0).abs() < f64::EPSILON);
		assert!((config.maximum_drop + 15000.0).abs() < f64::EPSILON);
		assert!(config.minimum_altitude.is_none());
		assert!((config.step_multiplier - 1.0).abs() < f64::EPSILON);
		assert!((config.zero_finding_accuracy - 5e-6).abs() < f64::EPSILON);
		assert_eq!(config.max_zero_iterations, 50);
		assert_eq!(config.max_range_iterations, 40);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn test_validate_rejects_non_finite() {
		let config = EngineConfig {
			step_multiplier: f64::NAN,
			..EngineConfig::default()
		};
		assert!(config.validate().is_err());

		let config = EngineConfig {
			maximum_drop: f64::NEG_INFINITY,
			..EngineConfig::default()
		};
		assert!(config.validate().is_err());
	}

	#[test]
	fn test_partial_json_uses_defaults() {
		let config: EngineConfig =
			serde_json::from_str(r#"{"minimum_velocity": 0.0, "step_multiplier": 5.0}"#).unwrap();
		assert!((config.minimum_velocity).abs() < f64::EPSILON);
		assert!((config.step_multiplier - 5.0).abs() < f64::EPSILON);
		assert!((config.maximum_drop + 15000.0).abs() < f64::EPSILON);
	}
}
