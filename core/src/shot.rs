//! Shot description and the flat per-shot snapshot consumed by the engine.
//!
//! Callers describe a shot with the high-level [`DragModel`] / [`Ammo`] /
//! [`Weapon`] / [`Shot`] types. [`ShotProps::from_shot`] flattens them into
//! a value snapshot (canonical units, no back references) that a single
//! integration or solve call owns for its duration.

use serde::{Deserialize, Serialize};

use crate::atmosphere::Atmosphere;
use crate::config::EngineConfig;
use crate::drag::{CurveMethod, DragCurve, DragDataPoint};
use crate::error::Result;
use crate::wind::{WindSegment, WindSock};

/// Degrees Fahrenheit per degree Celsius.
const F_PER_C: f64 = 9.0 / 5.0;

/// Powder sensitivity is expressed per this many degrees Celsius.
const POWDER_SENS_INTERVAL_C: f64 = 15.0;

/// Drag model: a tabulated standard curve plus the bullet's ballistic
/// coefficient, and the physical dimensions needed for spin drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragModel {
	/// Ballistic coefficient relative to the drag table.
	pub bc: f64,

	/// `(Mach, CD)` knots, strictly increasing in Mach.
	pub table: Vec<DragDataPoint>,

	/// Bullet weight, grains. Zero when unknown.
	pub weight: f64,

	/// Bullet diameter, inches. Zero when unknown.
	pub diameter: f64,

	/// Bullet length, inches. Zero when unknown.
	pub length: f64,
}

impl DragModel {
	/// Drag model without bullet dimensions (no spin drift).
	#[must_use]
	pub fn new(bc: f64, table: &[DragDataPoint]) -> Self {
		Self {
			bc,
			table: table.to_vec(),
			weight: 0.0,
			diameter: 0.0,
			length: 0.0,
		}
	}

	/// Drag model with dimensions for stability and spin-drift computation.
	#[must_use]
	pub fn with_dimensions(
		bc: f64,
		table: &[DragDataPoint],
		weight_grains: f64,
		diameter_in: f64,
		length_in: f64,
	) -> Self {
		Self {
			bc,
			table: table.to_vec(),
			weight: weight_grains,
			diameter: diameter_in,
			length: length_in,
		}
	}
}

/// Ammunition: drag model, muzzle velocity, and optional powder-temperature
/// sensitivity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ammo {
	/// Drag model for the projectile.
	pub dm: DragModel,

	/// Nominal muzzle velocity, fps.
	pub muzzle_velocity: f64,

	/// Temperature the nominal velocity was measured at, °F.
	pub powder_temperature: f64,

	/// Fractional velocity change per 15 °C of powder temperature.
	pub temp_modifier: f64,

	/// Whether to adjust muzzle velocity for the shot's air temperature.
	pub use_powder_sensitivity: bool,
}

impl Ammo {
	/// Ammo with no powder sensitivity, measured at 59 °F.
	#[must_use]
	pub fn new(dm: DragModel, muzzle_velocity_fps: f64) -> Self {
		Self {
			dm,
			muzzle_velocity: muzzle_velocity_fps,
			powder_temperature: 59.0,
			temp_modifier: 0.0,
			use_powder_sensitivity: false,
		}
	}

	/// Derive the temperature modifier from a second chronographed velocity.
	///
	/// # Errors
	///
	/// [`crate::Error::InvalidInput`] when either the velocity or the
	/// temperature matches the nominal point (the slope is undefined).
	pub fn calc_powder_sens(&mut self, other_velocity_fps: f64, other_temperature_f: f64) -> Result<f64> {
		let v_delta = (self.muzzle_velocity - other_velocity_fps).abs();
		let t_delta_c = (self.powder_temperature - other_temperature_f).abs() / F_PER_C;
		if v_delta == 0.0 || t_delta_c == 0.0 {
			return Err(crate::error::Error::input(
				"powder sensitivity needs a second point with different velocity and temperature",
			));
		}
		let v_lower = self.muzzle_velocity.min(other_velocity_fps);
		self.temp_modifier = v_delta / t_delta_c * (POWDER_SENS_INTERVAL_C / v_lower);
		Ok(self.temp_modifier)
	}

	/// Muzzle velocity at the given air temperature, fps.
	#[must_use]
	pub fn velocity_for_temp(&self, temperature_f: f64) -> f64 {
		let t_delta_c = (temperature_f - self.powder_temperature) / F_PER_C;
		self.temp_modifier * self.muzzle_velocity / POWDER_SENS_INTERVAL_C * t_delta_c
			+ self.muzzle_velocity
	}
}

/// Weapon geometry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Weapon {
	/// Scope height above the bore axis, feet.
	pub sight_height: f64,

	/// Barrel twist, inches per turn. Signed: negative is left-hand.
	/// Zero disables spin-drift computation.
	pub twist: f64,
}

impl Weapon {
	/// Weapon from sight height (feet) and twist (inches per turn).
	#[must_use]
	pub const fn new(sight_height_ft: f64, twist_in: f64) -> Self {
		Self {
			sight_height: sight_height_ft,
			twist: twist_in,
		}
	}
}

impl Default for Weapon {
	fn default() -> Self {
		Self::new(0.0, 0.0)
	}
}

/// A firing solution to integrate: ammo, weapon, conditions, and angles.
#[derive(Debug, Clone)]
pub struct Shot {
	pub ammo: Ammo,
	pub weapon: Weapon,
	pub atmo: Atmosphere,
	pub winds: Vec<WindSegment>,

	/// Angle of the sight line above horizontal (slant shooting), radians.
	pub look_angle: f64,

	/// Barrel elevation relative to the sight line, radians.
	pub relative_angle: f64,

	/// Rotation of the sight plane about the bore axis, radians.
	pub cant_angle: f64,
}

impl Shot {
	/// Shot at standard sea-level conditions, no wind, level sight line.
	#[must_use]
	pub fn new(ammo: Ammo, weapon: Weapon) -> Self {
		Self {
			ammo,
			weapon,
			atmo: Atmosphere::icao(0.0),
			winds: Vec::new(),
			look_angle: 0.0,
			relative_angle: 0.0,
			cant_angle: 0.0,
		}
	}

	/// Total barrel elevation above horizontal, radians.
	#[must_use]
	pub fn barrel_elevation(&self) -> f64 {
		self.look_angle + self.relative_angle
	}
}

/// Flat, precomputed snapshot of one shot in canonical units.
///
/// Owned by a single integration or solve call; cloning one and handing the
/// clones to separate threads is the supported way to parallelize.
#[derive(Debug, Clone)]
pub struct ShotProps {
	/// Muzzle velocity after any powder-temperature adjustment, fps.
	pub muzzle_velocity: f64,

	/// Sight height above bore, feet.
	pub sight_height: f64,

	/// Barrel elevation above horizontal, radians.
	pub barrel_elevation: f64,

	/// Barrel azimuth, radians.
	pub barrel_azimuth: f64,

	/// Sight-line angle above horizontal, radians.
	pub look_angle: f64,

	/// Cant angle, radians.
	pub cant_angle: f64,

	/// Launch altitude, feet.
	pub alt0: f64,

	/// Bullet weight, grains.
	pub weight: f64,

	/// Barrel twist, inches per turn, signed.
	pub twist: f64,

	/// Miller gyroscopic stability coefficient; 0 disables spin drift.
	pub stability_coefficient: f64,

	pub(crate) curve: DragCurve,
	pub(crate) atmo: Atmosphere,
	pub(crate) wind_sock: WindSock,
}

impl ShotProps {
	/// Build the snapshot for a shot.
	///
	/// # Errors
	///
	/// Propagates drag-table and input validation failures.
	pub fn from_shot(shot: &Shot, config: &EngineConfig) -> Result<Self> {
		config.validate()?;
		let curve = DragCurve::new(&shot.ammo.dm.table, shot.ammo.dm.bc, CurveMethod::default())?;
		let muzzle_velocity = if shot.ammo.use_powder_sensitivity {
			shot.ammo.velocity_for_temp(shot.atmo.temperature())
		} else {
			shot.ammo.muzzle_velocity
		};

		let dm = &shot.ammo.dm;
		let stability_coefficient = miller_stability(
			dm.weight,
			dm.diameter,
			dm.length,
			shot.weapon.twist,
			muzzle_velocity,
			shot.atmo.temperature(),
			shot.atmo.pressure(),
		);

		let wind_sock = WindSock::new(shot.winds.clone(), shot.look_angle, shot.cant_angle);

		Ok(Self {
			muzzle_velocity,
			sight_height: shot.weapon.sight_height,
			barrel_elevation: shot.barrel_elevation(),
			barrel_azimuth: 0.0,
			look_angle: shot.look_angle,
			cant_angle: shot.cant_angle,
			alt0: shot.atmo.altitude(),
			weight: dm.weight,
			twist: shot.weapon.twist,
			stability_coefficient,
			curve,
			atmo: shot.atmo,
			wind_sock,
		})
	}

	/// Copy of this snapshot with a different barrel elevation. The wind
	/// cursor is reset so the copy can start a fresh integration.
	#[must_use]
	pub fn with_elevation(&self, barrel_elevation: f64) -> Self {
		let mut props = self.clone();
		props.barrel_elevation = barrel_elevation;
		props
	}

	/// Lateral spin drift at flight time `t` seconds, feet. Positive for
	/// right-hand twist. Zero when stability could not be computed.
	#[must_use]
	pub fn spin_drift(&self, time: f64) -> f64 {
		if self.stability_coefficient <= 0.0 || self.twist == 0.0 {
			return 0.0;
		}
		let sign = if self.twist > 0.0 { 1.0 } else { -1.0 };
		sign * 1.25 * (self.stability_coefficient + 1.2) * time.powf(1.83) / 12.0
	}

	/// Drag acceleration coefficient at the given Mach number.
	#[must_use]
	pub fn drag_by_mach(&self, mach: f64) -> f64 {
		self.curve.drag_by_mach(mach)
	}

	/// Density ratio and speed of sound at an altitude, feet.
	#[must_use]
	pub fn density_and_mach_for_altitude(&self, altitude_ft: f64) -> (f64, f64) {
		self.atmo.density_and_mach_for_altitude(altitude_ft)
	}
}

/// Miller gyroscopic stability, zero when any required dimension is missing.
fn miller_stability(
	weight_grains: f64,
	diameter_in: f64,
	length_in: f64,
	twist_in: f64,
	muzzle_velocity_fps: f64,
	temperature_f: f64,
	pressure_in_hg: f64,
) -> f64 {
	if twist_in == 0.0 || weight_grains <= 0.0 || diameter_in <= 0.0 || length_in <= 0.0 {
		return 0.0;
	}
	let twist = twist_in.abs() / diameter_in;
	let length = length_in / diameter_in;
	let sd = 30.0 * weight_grains
		/ (twist.powi(2) * diameter_in.powi(3) * length * (1.0 + length.powi(2)));
	let fv = (muzzle_velocity_fps / 2800.0).powf(1.0 / 3.0);
	let ftp = ((temperature_f + 460.0) / (59.0 + 460.0)) * (29.92 / pressure_in_hg);
	sd * fv * ftp
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tables::TABLE_G7;
	use approx::assert_relative_eq;

	fn test_shot() -> Shot {
		let dm = DragModel::with_dimensions(0.29, TABLE_G7, 175.0, 0.308, 1.25);
		let ammo = Ammo::new(dm, 2780.0);
		Shot::new(ammo, Weapon::new(2.0 / 12.0, 10.0))
	}

	#[test]
	fn test_miller_stability_known_value() {
		// 175 gr .308, 1.25 in long, 1:10 twist at 2800 fps and standard
		// conditions: comfortably stable, Sg in the 2.2..2.6 band.
		let sg = miller_stability(175.0, 0.308, 1.25, 10.0, 2800.0, 59.0, 29.92);
		assert!(sg > 2.2 && sg < 2.6, "Sg out of expected band: {sg}");
	}

	#[test]
	fn test_stability_zero_without_dimensions() {
		let dm = DragModel::new(0.29, TABLE_G7);
		let ammo = Ammo::new(dm, 2780.0);
		let shot = Shot::new(ammo, Weapon::new(0.0, 10.0));
		let props = ShotProps::from_shot(&shot, &EngineConfig::default()).unwrap();
		assert!((props.stability_coefficient).abs() < f64::EPSILON);
		assert!((props.spin_drift(1.0)).abs() < f64::EPSILON);
	}

	#[test]
	fn test_spin_drift_sign_follows_twist() {
		let shot = test_shot();
		let props = ShotProps::from_shot(&shot, &EngineConfig::default()).unwrap();
		assert!(props.spin_drift(1.0) > 0.0, "right twist drifts right");

		let mut left = test_shot();
		left.weapon.twist = -10.0;
		let props = ShotProps::from_shot(&left, &EngineConfig::default()).unwrap();
		assert!(props.spin_drift(1.0) < 0.0, "left twist drifts left");
	}

	#[test]
	fn test_spin_drift_grows_with_time() {
		let props = ShotProps::from_shot(&test_shot(), &EngineConfig::default()).unwrap();
		let mut last = 0.0;
		for t in [0.1, 0.25, 0.5, 1.0, 1.5] {
			let drift = props.spin_drift(t);
			assert!(drift > last);
			last = drift;
		}
	}

	#[test]
	fn test_powder_sensitivity_round_trip() {
		let dm = DragModel::new(0.29, TABLE_G7);
		let mut ammo = Ammo::new(dm, 2600.0);
		ammo.powder_temperature = 59.0;
		// Chronographed 2574 fps at 32 F (15 C colder).
		ammo.calc_powder_sens(2574.0, 32.0).unwrap();
		assert_relative_eq!(ammo.velocity_for_temp(32.0), 2574.0, epsilon = 0.5);
		assert_relative_eq!(ammo.velocity_for_temp(59.0), 2600.0, epsilon = 1e-9);
		// Warmer than nominal: faster.
		assert!(ammo.velocity_for_temp(86.0) > 2600.0);
	}

	#[test]
	fn test_powder_sensitivity_rejects_degenerate_point() {
		let dm = DragModel::new(0.29, TABLE_G7);
		let mut ammo = Ammo::new(dm, 2600.0);
		assert!(ammo.calc_powder_sens(2600.0, 32.0).is_err());
		assert!(ammo.calc_powder_sens(2500.0, 59.0).is_err());
	}

	#[test]
	fn test_snapshot_applies_powder_sensitivity() {
		let mut shot = test_shot();
		shot.ammo.temp_modifier = 1.0;
		shot.ammo.use_powder_sensitivity = true;
		shot.atmo = Atmosphere::new(0.0, 29.92, 32.0, 0.0);
		let props = ShotProps::from_shot(&shot, &EngineConfig::default()).unwrap();
		assert!(props.muzzle_velocity < shot.ammo.muzzle_velocity);
	}

	#[test]
	fn test_with_elevation_only_changes_elevation() {
		let props = ShotProps::from_shot(&test_shot(), &EngineConfig::default()).unwrap();
		let raised = props.with_elevation(0.05);
		assert_relative_eq!(raised.barrel_elevation, 0.05);
		assert_relative_eq!(raised.muzzle_velocity, props.muzzle_velocity);
		assert_relative_eq!(raised.look_angle, props.look_angle);
	}
}
