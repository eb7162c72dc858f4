//! Wind profile segments and the downrange cursor that resolves them.
//!
//! A profile is a list of segments ordered by `until_distance`; the last
//! segment extends to infinity. Direction convention (direction the wind
//! blows *from*, measured at the shooter): 0 = tailwind (+x), π/2 = wind
//! from the left pushing right (+z), π = headwind, 3π/2 = right-to-left.

use serde::{Deserialize, Serialize};

use crate::vector::Vector3;

/// Sentinel for "no further transition".
const UNBOUNDED_RANGE_FT: f64 = 1e7;

/// One wind band, valid from the previous segment's boundary out to
/// `until_distance` feet downrange.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindSegment {
	/// Wind speed, fps.
	pub velocity: f64,

	/// Direction the wind blows from, radians.
	pub direction_from: f64,

	/// Downrange distance this segment is valid until, feet.
	pub until_distance: f64,
}

impl WindSegment {
	/// Create a segment.
	#[must_use]
	pub const fn new(velocity: f64, direction_from: f64, until_distance: f64) -> Self {
		Self {
			velocity,
			direction_from,
			until_distance,
		}
	}
}

/// Resolve a wind segment into an engine-frame velocity vector.
///
/// The sight (look) and cant angles rotate the crosswind and range
/// components into the canted sight frame the integrator works in.
#[must_use]
pub fn wind_to_vector(segment: &WindSegment, look_angle: f64, cant_angle: f64) -> Vector3 {
	let sight_cos = look_angle.cos();
	let sight_sin = look_angle.sin();
	let cant_cos = cant_angle.cos();
	let cant_sin = cant_angle.sin();

	let range_velocity = segment.velocity * segment.direction_from.cos();
	let cross_component = segment.velocity * segment.direction_from.sin();
	let range_factor = -range_velocity * sight_sin;

	Vector3::new(
		range_velocity * sight_cos,
		range_factor * cant_cos + cross_component * cant_sin,
		cross_component * cant_cos - range_factor * cant_sin,
	)
}

/// Cursor over a wind profile for one integration pass.
///
/// Downrange distances presented to [`WindSock::vector_for_range`] must be
/// non-decreasing; the cursor advances through segment boundaries once and
/// caches the current vector between them.
#[derive(Debug, Clone)]
pub struct WindSock {
	segments: Vec<WindSegment>,
	look_angle: f64,
	cant_angle: f64,
	index: usize,
	next_range: f64,
	current: Vector3,
}

impl WindSock {
	/// Build a cursor; segments are sorted by `until_distance`.
	#[must_use]
	pub fn new(mut segments: Vec<WindSegment>, look_angle: f64, cant_angle: f64) -> Self {
		segments.sort_by(|a, b| a.until_distance.total_cmp(&b.until_distance));
		let mut sock = Self {
			segments,
			look_angle,
			cant_angle,
			index: 0,
			next_range: UNBOUNDED_RANGE_FT,
			current: Vector3::ZERO,
		};
		sock.update_cache();
		sock
	}

	/// Wind vector for the given downrange distance (feet, non-decreasing
	/// across calls). An empty profile yields the zero vector.
	pub fn vector_for_range(&mut self, x_ft: f64) -> Vector3 {
		while x_ft >= self.next_range && self.index + 1 < self.segments.len() {
			self.index += 1;
			self.update_cache();
		}
		self.current
	}

	fn update_cache(&mut self) {
		match self.segments.get(self.index) {
			Some(segment) => {
				self.current = wind_to_vector(segment, self.look_angle, self.cant_angle);
				// The last segment extends to infinity regardless of its
				// own boundary.
				self.next_range = if self.index + 1 < self.segments.len() {
					segment.until_distance
				} else {
					UNBOUNDED_RANGE_FT
				};
			},
			None => {
				self.current = Vector3::ZERO;
				self.next_range = UNBOUNDED_RANGE_FT;
			},
		}
	}
}
