//! Trajectory samples, hit results, and keyed lookups.

use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::error::{Error, RangeCause, Result};

/// Divisor in the muzzle-energy formula `w · v² / 450400` (grains, fps →
/// ft·lb).
const ENERGY_DIVISOR: f64 = 450_400.0;

/// Coefficient of the optimal-game-weight heuristic `w² · v³ · 1.5e-12`.
const OGW_COEFF: f64 = 1.5e-12;

/// Event-flag bitmask attached to trajectory samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrajFlag(pub u32);

impl TrajFlag {
	/// No event.
	pub const NONE: Self = Self(0);

	/// Upward crossing of the sight line.
	pub const ZERO_UP: Self = Self(1);

	/// Downward crossing of the sight line.
	pub const ZERO_DOWN: Self = Self(1 << 1);

	/// Either sight-line crossing.
	pub const ZERO: Self = Self(Self::ZERO_UP.0 | Self::ZERO_DOWN.0);

	/// Velocity crossing the local speed of sound.
	pub const MACH: Self = Self(1 << 2);

	/// A requested range mark.
	pub const RANGE: Self = Self(1 << 3);

	/// Maximum height above the sight line.
	pub const APEX: Self = Self(1 << 4);

	/// Closest approach to the target point on the sight line.
	pub const MRT: Self = Self(1 << 5);

	/// Every event.
	pub const ALL: Self = Self(
		Self::ZERO.0 | Self::MACH.0 | Self::RANGE.0 | Self::APEX.0 | Self::MRT.0,
	);

	/// Whether any bit of `other` is set in `self`.
	#[must_use]
	pub const fn contains(self, other: Self) -> bool {
		self.0 & other.0 != 0
	}
}

impl BitOr for TrajFlag {
	type Output = Self;

	fn bitor(self, rhs: Self) -> Self {
		Self(self.0 | rhs.0)
	}
}

impl BitOrAssign for TrajFlag {
	fn bitor_assign(&mut self, rhs: Self) {
		self.0 |= rhs.0;
	}
}

/// Muzzle/impact energy in ft·lb from weight (grains) and speed (fps).
#[must_use]
pub fn calculate_energy(weight_grains: f64, velocity_fps: f64) -> f64 {
	weight_grains * velocity_fps * velocity_fps / ENERGY_DIVISOR
}

/// Optimal-game-weight hunting heuristic, pounds.
#[must_use]
pub fn calculate_ogw(weight_grains: f64, velocity_fps: f64) -> f64 {
	weight_grains * weight_grains * velocity_fps.powi(3) * OGW_COEFF
}

/// One user-facing trajectory sample, canonical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryData {
	/// Flight time, seconds.
	pub time: f64,

	/// Horizontal distance traveled, feet.
	pub distance: f64,

	/// Speed, fps.
	pub velocity: f64,

	/// Speed over the local speed of sound.
	pub mach: f64,

	/// Height relative to the sight-line origin, feet.
	pub height: f64,

	/// Perpendicular height above the (possibly slanted) sight line, feet.
	pub slant_height: f64,

	/// Distance along the sight line, feet.
	pub slant_distance: f64,

	/// Horizontal deflection including spin drift, feet. Right positive.
	pub windage: f64,

	/// Angular correction to the point of impact height, radians.
	pub drop_adjustment: f64,

	/// Angular correction to the windage, radians.
	pub windage_adjustment: f64,

	/// Kinetic energy, ft·lb.
	pub energy: f64,

	/// Optimal game weight, pounds.
	pub ogw: f64,

	/// Events this sample marks.
	pub flag: TrajFlag,
}

/// Key attribute for [`HitResult::get_at`] lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleKey {
	Time,
	Distance,
	Height,
	Velocity,
	Mach,
	SlantHeight,
}

impl SampleKey {
	/// Extract the keyed value from a sample.
	#[must_use]
	pub fn extract(self, sample: &TrajectoryData) -> f64 {
		match self {
			Self::Time => sample.time,
			Self::Distance => sample.distance,
			Self::Height => sample.height,
			Self::Velocity => sample.velocity,
			Self::Mach => sample.mach,
			Self::SlantHeight => sample.slant_height,
		}
	}

	/// Keys guaranteed monotone along a trajectory, eligible for bisection.
	#[must_use]
	pub const fn is_monotone(self) -> bool {
		matches!(self, Self::Time | Self::Distance)
	}

	const fn name(self) -> &'static str {
		match self {
			Self::Time => "time",
			Self::Distance => "distance",
			Self::Height => "height",
			Self::Velocity => "velocity",
			Self::Mach => "mach",
			Self::SlantHeight => "slant_height",
		}
	}
}

/// The outcome of one integration: the sampled trajectory plus, when the
/// integrator stopped early, the reason it did.
#[derive(Debug, Clone)]
pub struct HitResult {
	/// Samples in strictly increasing time order.
	pub trajectory: Vec<TrajectoryData>,

	/// `Some` when the trajectory is partial.
	pub incomplete: Option<RangeCause>,
}

impl HitResult {
	/// Whether the integration reached its requested range.
	#[must_use]
	pub fn is_complete(&self) -> bool {
		self.incomplete.is_none()
	}

	/// First sample marking the given event, if any.
	#[must_use]
	pub fn flag(&self, flag: TrajFlag) -> Option<&TrajectoryData> {
		self.trajectory.iter().find(|s| s.flag.contains(flag))
	}

	/// First sample at which `key` equals `value`, interpolating between the
	/// bracketing neighbors.
	///
	/// Monotone keys (time, distance) bisect; the rest scan forward,
	/// optionally starting at the first sample with `time >=
	/// start_from_time`.
	///
	/// # Errors
	///
	/// [`Error::NotFound`] when no pair of neighbors brackets `value`.
	pub fn get_at(
		&self,
		key: SampleKey,
		value: f64,
		start_from_time: Option<f64>,
	) -> Result<TrajectoryData> {
		let samples = &self.trajectory;
		let not_found = || Error::NotFound {
			key: key.name(),
			value,
		};
		if samples.is_empty() {
			return Err(not_found());
		}

		let start = match start_from_time {
			Some(t) => samples.partition_point(|s| s.time < t),
			None => 0,
		};
		if start >= samples.len() {
			return Err(not_found());
		}

		if key.is_monotone() {
			let slice = &samples[start..];
			let first = key.extract(&slice[0]);
			let last = key.extract(&slice[slice.len() - 1]);
			if value < first || value > last {
				return Err(not_found());
			}
			let idx = slice.partition_point(|s| key.extract(s) < value);
			if idx == 0 {
				return Ok(slice[0]);
			}
			return Ok(lerp_samples(&slice[idx - 1], &slice[idx], key, value));
		}

		for pair in samples[start..].windows(2) {
			let a = key.extract(&pair[0]);
			let b = key.extract(&pair[1]);
			if (a <= value && value <= b) || (b <= value && value <= a) {
				return Ok(lerp_samples(&pair[0], &pair[1], key, value));
			}
		}
		Err(not_found())
	}

	/// Sight-line interval around the sample at `at_range` (feet downrange)
	/// over which the trajectory stays within ±half of `target_height`
	/// (feet) of the sight line. Returns `(begin, end)` slant distances.
	///
	/// # Errors
	///
	/// [`Error::NotFound`] when `at_range` is outside the sampled
	/// trajectory.
	pub fn danger_space(&self, at_range: f64, target_height: f64) -> Result<(f64, f64)> {
		let center = self.get_at(SampleKey::Distance, at_range, None)?;
		let half = target_height.abs() / 2.0;

		// Walk backward to where the trajectory rises above the window.
		let idx = self
			.trajectory
			.partition_point(|s| s.distance < center.distance)
			.min(self.trajectory.len() - 1);
		let mut begin = self.trajectory[0].slant_distance;
		for i in (0..idx).rev() {
			let s = &self.trajectory[i];
			if s.slant_height > half {
				let next = &self.trajectory[i + 1];
				begin = crate::interpolate::interpolate_2_pt(
					half,
					s.slant_height,
					s.slant_distance,
					next.slant_height,
					next.slant_distance,
				);
				break;
			}
		}

		// Walk forward to where it falls below the window.
		let mut end = self.trajectory[self.trajectory.len() - 1].slant_distance;
		for i in idx..self.trajectory.len() {
			let s = &self.trajectory[i];
			if s.slant_height < -half {
				if i > 0 {
					let prev = &self.trajectory[i - 1];
					end = crate::interpolate::interpolate_2_pt(
						-half,
						prev.slant_height,
						prev.slant_distance,
						s.slant_height,
						s.slant_distance,
					);
				}
				break;
			}
		}

		Ok((begin, end))
	}
}

/// Linear interpolation of every sample field in the key's value space.
fn lerp_samples(a: &TrajectoryData, b: &TrajectoryData, key: SampleKey, value: f64) -> TrajectoryData {
	let ka = key.extract(a);
	let kb = key.extract(b);
	if ka == kb {
		return *a;
	}
	let t = (value - ka) / (kb - ka);
	let lerp = |x: f64, y: f64| x + t * (y - x);
	TrajectoryData {
		time: lerp(a.time, b.time),
		distance: lerp(a.distance, b.distance),
		velocity: lerp(a.velocity, b.velocity),
		mach: lerp(a.mach, b.mach),
		height: lerp(a.height, b.height),
		slant_height: lerp(a.slant_height, b.slant_height),
		slant_distance: lerp(a.slant_distance, b.slant_distance),
		windage: lerp(a.windage, b.windage),
		drop_adjustment: lerp(a.drop_adjustment, b.drop_adjustment),
		windage_adjustment: lerp(a.windage_adjustment, b.windage_adjustment),
		energy: lerp(a.energy, b.energy),
		ogw: lerp(a.ogw, b.ogw),
		flag: TrajFlag::NONE,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	fn sample(time: f64, distance: f64, velocity: f64) -> TrajectoryData {
		TrajectoryData {
			time,
			distance,
			velocity,
			mach: velocity / 1116.45,
			height: -0.01 * distance,
			slant_height: -0.01 * distance,
			slant_distance: distance,
			windage: 0.0,
			drop_adjustment: 0.0,
			windage_adjustment: 0.0,
			energy: velocity * velocity * 168.0 / 450_400.0,
			ogw: 0.0,
			flag: TrajFlag::NONE,
		}
	}

	fn result() -> HitResult {
		HitResult {
			trajectory: (0..=10)
				.map(|i| {
					let t = f64::from(i) * 0.1;
					sample(t, t * 2500.0, 2600.0 - 100.0 * f64::from(i))
				})
				.collect(),
			incomplete: None,
		}
	}

	#[test]
	fn test_flag_bit_algebra() {
		let mut flag = TrajFlag::NONE;
		flag |= TrajFlag::ZERO_UP;
		flag |= TrajFlag::APEX;
		assert!(flag.contains(TrajFlag::ZERO_UP));
		assert!(flag.contains(TrajFlag::ZERO));
		assert!(flag.contains(TrajFlag::APEX));
		assert!(!flag.contains(TrajFlag::MACH));
		assert!(TrajFlag::ALL.contains(TrajFlag::MRT));
	}

	#[test]
	fn test_energy_and_ogw() {
		assert_relative_eq!(calculate_energy(168.0, 2750.0), 2820.5, epsilon = 0.1);
		assert_relative_eq!(
			calculate_ogw(168.0, 2750.0),
			168.0 * 168.0 * 2750.0_f64.powi(3) * 1.5e-12,
			epsilon = 1e-9
		);
	}

	#[test]
	fn test_get_at_monotone_exact_and_interpolated() {
		let hit = result();
		let exact = hit.get_at(SampleKey::Time, 0.3, None).unwrap();
		assert_relative_eq!(exact.distance, 750.0, epsilon = 1e-9);

		let mid = hit.get_at(SampleKey::Distance, 625.0, None).unwrap();
		assert_relative_eq!(mid.time, 0.25, epsilon = 1e-12);
		assert_relative_eq!(mid.velocity, 2350.0, epsilon = 1e-9);
	}

	#[test]
	fn test_get_at_scan_key() {
		let hit = result();
		let v = hit.get_at(SampleKey::Velocity, 2150.0, None).unwrap();
		assert_relative_eq!(v.time, 0.45, epsilon = 1e-12);
	}

	#[test]
	fn test_get_at_start_from_time() {
		let hit = result();
		let late = hit.get_at(SampleKey::Velocity, 1700.0, Some(0.5)).unwrap();
		assert_relative_eq!(late.time, 0.9, epsilon = 1e-12);
		assert!(hit.get_at(SampleKey::Velocity, 2500.0, Some(0.5)).is_err());
	}

	#[test]
	fn test_get_at_outside_range_not_found() {
		let hit = result();
		assert!(matches!(
			hit.get_at(SampleKey::Distance, 1e6, None),
			Err(Error::NotFound { .. })
		));
		assert!(matches!(
			hit.get_at(SampleKey::Time, -1.0, None),
			Err(Error::NotFound { .. })
		));
	}

	#[test]
	fn test_flag_lookup() {
		let mut hit = result();
		hit.trajectory[4].flag = TrajFlag::MACH;
		assert_relative_eq!(hit.flag(TrajFlag::MACH).unwrap().time, 0.4);
		assert!(hit.flag(TrajFlag::APEX).is_none());
	}

	#[test]
	fn test_danger_space_brackets_target() {
		// Arching trajectory: slant height falls through +h/2 on the way
		// down from the apex, then through -h/2 past the zero point.
		let mut hit = result();
		for (i, s) in hit.trajectory.iter_mut().enumerate() {
			let x = f64::from(u32::try_from(i).unwrap());
			s.slant_height = 1.5 - 0.06 * (x - 3.0) * (x - 3.0);
		}
		// Sample 8 sits exactly on the sight line (distance 2000 ft).
		let (begin, end) = hit.danger_space(2000.0, 2.0).unwrap();
		assert!(begin > 1250.0 && begin < 1500.0, "begin {begin}");
		assert!(end > 2250.0 && end < 2500.0, "end {end}");
		assert!(begin < end);
	}
}
