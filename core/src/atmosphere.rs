//! Atmospheric model: air density and speed of sound versus altitude.
//!
//! ICAO-based, in fps units throughout: altitude in feet, pressure in inches
//! of mercury, temperature in Fahrenheit, density in lb/ft³. The struct
//! snapshots conditions at a reference altitude; the lapse formulas project
//! them to the projectile's instantaneous altitude during integration.

use log::warn;
use serde::{Deserialize, Serialize};

// ── ICAO constants (fps units) ─────────────────────────────────────────────
const STANDARD_TEMPERATURE_F: f64 = 59.0;
const STANDARD_PRESSURE_IN_HG: f64 = 29.92;
const STANDARD_DENSITY: f64 = 0.076474;
const STANDARD_HUMIDITY: f64 = 0.0;
const ICAO_STANDARD_TEMPERATURE_R: f64 = 518.67;
const ICAO_FREEZING_POINT_R: f64 = 459.67;
const TEMPERATURE_GRADIENT_F_PER_FT: f64 = -3.566_16e-03;
const PRESSURE_EXPONENT: f64 = -5.255876;
const SPEED_OF_SOUND_COEFF: f64 = 49.0223;

// ── Saturation vapor pressure polynomial, °F domain ────────────────────────
const A0: f64 = 1.24871;
const A1: f64 = 0.0988438;
const A2: f64 = 0.00152907;
const A3: f64 = -3.07031e-06;
const A4: f64 = 4.21329e-07;
const A5: f64 = 3.342e-04;

/// Evaluations clamp temperature at this floor.
const LOWEST_TEMPERATURE_F: f64 = -130.0;

/// Within this many feet of the reference altitude the precomputed
/// density/mach pair is reused unchanged.
const ALTITUDE_CACHE_WINDOW_FT: f64 = 30.0;

/// Default relative humidity when the caller supplies none.
const DEFAULT_HUMIDITY: f64 = 0.78;

/// Atmospheric conditions at a reference altitude.
///
/// Derived density and speed of sound are computed once at construction;
/// [`Atmosphere::density_and_mach_for_altitude`] projects them along the
/// standard lapse for other altitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Atmosphere {
	altitude: f64,
	pressure: f64,
	temperature: f64,
	humidity: f64,
	density: f64,
	mach1: f64,
}

impl Atmosphere {
	/// Atmosphere from explicit conditions.
	///
	/// `humidity` above 1 is interpreted as a percentage. Non-finite or
	/// out-of-range primary inputs fall back to the ICAO standard at sea
	/// level (with the customary 78% humidity), with a warning.
	#[must_use]
	pub fn new(altitude_ft: f64, pressure_in_hg: f64, temperature_f: f64, humidity: f64) -> Self {
		let mut humidity = humidity;
		if humidity > 1.0 {
			humidity /= 100.0;
		}

		let valid = altitude_ft.is_finite()
			&& pressure_in_hg.is_finite()
			&& pressure_in_hg > 0.0
			&& temperature_f.is_finite()
			&& (0.0..=1.0).contains(&humidity);
		if !valid {
			warn!(
				"invalid atmosphere inputs (alt {altitude_ft} ft, p {pressure_in_hg} inHg, \
				 t {temperature_f} F, rh {humidity}); using ICAO sea level"
			);
			return Self::build(
				0.0,
				STANDARD_PRESSURE_IN_HG,
				STANDARD_TEMPERATURE_F,
				DEFAULT_HUMIDITY,
			);
		}

		Self::build(altitude_ft, pressure_in_hg, temperature_f, humidity)
	}

	/// ICAO standard atmosphere at the given altitude (dry air).
	#[must_use]
	pub fn icao(altitude_ft: f64) -> Self {
		let altitude_ft = if altitude_ft.is_finite() { altitude_ft } else { 0.0 };
		let temperature = ICAO_STANDARD_TEMPERATURE_R + altitude_ft * TEMPERATURE_GRADIENT_F_PER_FT
			- ICAO_FREEZING_POINT_R;
		let pressure = STANDARD_PRESSURE_IN_HG
			* (ICAO_STANDARD_TEMPERATURE_R / (temperature + ICAO_FREEZING_POINT_R))
				.powf(PRESSURE_EXPONENT);
		Self::build(altitude_ft, pressure, temperature, STANDARD_HUMIDITY)
	}

	fn build(altitude: f64, pressure: f64, temperature: f64, humidity: f64) -> Self {
		let (density, mach1) = density_and_speed_of_sound(temperature, pressure, humidity);
		Self {
			altitude,
			pressure,
			temperature,
			humidity,
			density,
			mach1,
		}
	}

	/// Reference altitude, feet.
	#[must_use]
	pub fn altitude(&self) -> f64 {
		self.altitude
	}

	/// Pressure at the reference altitude, inHg.
	#[must_use]
	pub fn pressure(&self) -> f64 {
		self.pressure
	}

	/// Temperature at the reference altitude, °F.
	#[must_use]
	pub fn temperature(&self) -> f64 {
		self.temperature
	}

	/// Relative humidity as a fraction in [0, 1].
	#[must_use]
	pub fn humidity(&self) -> f64 {
		self.humidity
	}

	/// Air density at the reference altitude, lb/ft³.
	#[must_use]
	pub fn density(&self) -> f64 {
		self.density
	}

	/// Density divided by the ICAO sea-level standard density.
	#[must_use]
	pub fn density_ratio(&self) -> f64 {
		self.density / STANDARD_DENSITY
	}

	/// Speed of sound at the reference altitude, fps.
	#[must_use]
	pub fn mach1(&self) -> f64 {
		self.mach1
	}

	/// Density ratio and speed of sound at an arbitrary altitude.
	///
	/// Within 30 ft of the reference altitude the precomputed pair is
	/// returned unchanged; beyond that the standard lapse projects
	/// temperature and pressure before re-evaluating.
	#[must_use]
	pub fn density_and_mach_for_altitude(&self, altitude_ft: f64) -> (f64, f64) {
		if (self.altitude - altitude_ft).abs() < ALTITUDE_CACHE_WINDOW_FT {
			return (self.density / STANDARD_DENSITY, self.mach1);
		}

		let t = clamp_temperature(
			self.temperature + (altitude_ft - self.altitude) * TEMPERATURE_GRADIENT_F_PER_FT,
		);
		let t0_rankine = self.temperature + ICAO_FREEZING_POINT_R;
		let t_rankine = t + ICAO_FREEZING_POINT_R;
		let p = self.pressure * (t0_rankine / t_rankine).powf(PRESSURE_EXPONENT);

		let (density, mach1) = density_and_speed_of_sound(t, p, self.humidity);
		(density / STANDARD_DENSITY, mach1)
	}
}

impl Default for Atmosphere {
	fn default() -> Self {
		Self::icao(0.0)
	}
}

/// Clamp a temperature at the documented floor, warning when it bites.
fn clamp_temperature(temperature_f: f64) -> f64 {
	if temperature_f < LOWEST_TEMPERATURE_F {
		warn!(
			"temperature {temperature_f} F below the {LOWEST_TEMPERATURE_F} F floor; clamping"
		);
		LOWEST_TEMPERATURE_F
	} else {
		temperature_f
	}
}

/// Density (lb/ft³) and speed of sound (fps) for given conditions.
///
/// The humidity term of the pressure correction is dropped at or below 0 °F,
/// where the saturation polynomial is not valid. Temperatures below the
/// −130 °F floor clamp with a warning.
fn density_and_speed_of_sound(temperature_f: f64, pressure_in_hg: f64, humidity: f64) -> (f64, f64) {
	let t = clamp_temperature(temperature_f);

	let vapor_correction = if t > 0.0 {
		let et0 = A0 + t * (A1 + t * (A2 + t * (A3 + t * A4)));
		0.3783 * A5 * humidity * et0
	} else {
		0.0
	};
	let pressure_term = (pressure_in_hg - vapor_correction) / STANDARD_PRESSURE_IN_HG;

	let t_rankine = t + ICAO_FREEZING_POINT_R;
	let density = STANDARD_DENSITY * (ICAO_STANDARD_TEMPERATURE_R / t_rankine) * pressure_term;
	let mach1 = t_rankine.sqrt() * SPEED_OF_SOUND_COEFF;
	(density, mach1)
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	#[test]
	fn test_icao_sea_level() {
		let atmo = Atmosphere::icao(0.0);
		assert_relative_eq!(atmo.temperature(), STANDARD_TEMPERATURE_F, epsilon = 1e-9);
		assert_relative_eq!(atmo.pressure(), STANDARD_PRESSURE_IN_HG, epsilon = 1e-9);
		assert_relative_eq!(atmo.density_ratio(), 1.0, epsilon = 1e-9);
		// Speed of sound at 59 F is about 1116.45 fps.
		assert_relative_eq!(atmo.mach1(), 1116.45, epsilon = 0.5);
	}

	#[test]
	fn test_reference_altitude_identity() {
		let atmo = Atmosphere::icao(5000.0);
		let (ratio, mach) = atmo.density_and_mach_for_altitude(5000.0);
		assert_relative_eq!(ratio, atmo.density_ratio(), epsilon = 1e-9);
		assert_relative_eq!(mach, atmo.mach1(), epsilon = 1e-9);
	}

	#[test]
	fn test_altitude_cache_window() {
		let atmo = Atmosphere::icao(1000.0);
		let at_reference = atmo.density_and_mach_for_altitude(1000.0);
		for delta in [-29.9, -15.0, 0.0, 15.0, 29.9] {
			assert_eq!(atmo.density_and_mach_for_altitude(1000.0 + delta), at_reference);
		}
		assert_ne!(
			atmo.density_and_mach_for_altitude(1031.0),
			at_reference,
			"outside the window the pair must be recomputed"
		);
	}

	#[test]
	fn test_density_non_increasing_with_altitude() {
		let atmo = Atmosphere::icao(0.0);
		let mut last = f64::INFINITY;
		for step in 0..=60 {
			let alt = f64::from(step) * 1000.0;
			let (ratio, mach) = atmo.density_and_mach_for_altitude(alt);
			assert!(
				ratio <= last + 1e-12,
				"density ratio rose at {alt} ft: {ratio} > {last}"
			);
			assert!(mach > 0.0);
			last = ratio;
		}
	}

	#[test]
	fn test_humidity_percent_normalization() {
		let fractional = Atmosphere::new(0.0, 29.92, 59.0, 0.5);
		let percent = Atmosphere::new(0.0, 29.92, 59.0, 50.0);
		assert_relative_eq!(fractional.humidity(), percent.humidity(), epsilon = 1e-12);
		assert_relative_eq!(fractional.density(), percent.density(), epsilon = 1e-12);
	}

	#[test]
	fn test_humid_air_less_dense() {
		let dry = Atmosphere::new(0.0, 29.92, 59.0, 0.0);
		let humid = Atmosphere::new(0.0, 29.92, 59.0, 1.0);
		assert!(humid.density() < dry.density());
	}

	#[test]
	fn test_humidity_correction_dropped_below_zero_f() {
		let dry = Atmosphere::new(0.0, 29.92, -10.0, 0.0);
		let humid = Atmosphere::new(0.0, 29.92, -10.0, 1.0);
		assert_relative_eq!(dry.density(), humid.density(), epsilon = 1e-15);
	}

	#[test]
	fn test_invalid_inputs_fall_back_to_icao() {
		let atmo = Atmosphere::new(f64::NAN, 29.92, 59.0, 0.5);
		assert_relative_eq!(atmo.altitude(), 0.0);
		assert_relative_eq!(atmo.temperature(), STANDARD_TEMPERATURE_F);
		assert_relative_eq!(atmo.humidity(), DEFAULT_HUMIDITY);
	}

	#[test]
	fn test_temperature_floor_clamps() {
		let frozen = Atmosphere::new(0.0, 29.92, -200.0, 0.0);
		let floor = Atmosphere::new(0.0, 29.92, LOWEST_TEMPERATURE_F, 0.0);
		assert_relative_eq!(frozen.density(), floor.density(), epsilon = 1e-15);
		assert_relative_eq!(frozen.mach1(), floor.mach1(), epsilon = 1e-15);
	}

	#[test]
	fn test_negative_altitude_accepted() {
		let atmo = Atmosphere::icao(0.0);
		let (ratio, _) = atmo.density_and_mach_for_altitude(-1000.0);
		assert!(ratio > 1.0, "below sea level the air must be denser");
	}
}
