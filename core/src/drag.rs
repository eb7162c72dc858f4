//! Drag-curve construction and evaluation.
//!
//! A [`DragCurve`] maps Mach number to the drag acceleration coefficient
//! `K(M) = CD(M) · DRAG_CONST / BC` used by the integration engines. The
//! curve is built once per shot from a tabulated drag model and a single
//! ballistic coefficient; evaluation is a binary segment search plus a
//! monotone cubic (or linear) segment evaluation.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::interpolate::{hermite_eval, interpolate_2_pt, pchip_slopes_three_points};

/// Conversion from a standard drag coefficient to the acceleration
/// multiplier used by the engine: `K(M) = CD(M) * DRAG_CONST / BC`.
pub const DRAG_CONST: f64 = 2.08551e-04;

/// Drag coefficients at or above this value are rejected as implausible.
const MAX_VALID_CD: f64 = 2.0;

/// One `(Mach, CD)` knot of a tabulated drag model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragDataPoint {
	/// Velocity in Mach units. Knots must be strictly increasing.
	pub mach: f64,

	/// Drag coefficient at that Mach. Must lie in (0, 2).
	pub cd: f64,
}

impl DragDataPoint {
	/// Create a knot.
	#[must_use]
	pub const fn new(mach: f64, cd: f64) -> Self {
		Self { mach, cd }
	}
}

/// Segment evaluation method for a drag curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveMethod {
	/// Monotone piecewise-cubic Hermite (Fritsch–Carlson limited).
	#[default]
	Pchip,

	/// Piecewise linear between adjacent knots.
	Linear,
}

/// Immutable Mach → drag-acceleration-coefficient curve.
///
/// Knot evaluation reproduces `CD · DRAG_CONST / BC` exactly. Outside the
/// tabulated Mach range the boundary slope is held (linear extrapolation),
/// clamped so the coefficient never goes negative.
#[derive(Debug, Clone)]
pub struct DragCurve {
	mach: Vec<f64>,
	k: Vec<f64>,
	slope: Vec<f64>,
	method: CurveMethod,
}

impl DragCurve {
	/// Build a curve from a tabulated drag model and a ballistic coefficient.
	///
	/// # Errors
	///
	/// [`Error::InvalidDragTable`] when the table is empty, non-increasing in
	/// Mach, or contains a CD outside (0, 2); [`Error::InvalidInput`] when
	/// `bc` is not a positive finite number.
	pub fn new(table: &[DragDataPoint], bc: f64, method: CurveMethod) -> Result<Self> {
		if table.is_empty() {
			return Err(Error::drag_table("table must not be empty"));
		}
		if !bc.is_finite() || bc <= 0.0 {
			return Err(Error::input(format!(
				"ballistic coefficient must be a positive finite number, got {bc}"
			)));
		}
		for point in table {
			if !point.mach.is_finite() || point.mach < 0.0 {
				return Err(Error::drag_table(format!(
					"Mach values must be finite and non-negative, got {}",
					point.mach
				)));
			}
			if !point.cd.is_finite() || point.cd <= 0.0 || point.cd >= MAX_VALID_CD {
				return Err(Error::drag_table(format!(
					"CD values must lie in (0, {MAX_VALID_CD}), got {}",
					point.cd
				)));
			}
		}
		for pair in table.windows(2) {
			if pair[1].mach <= pair[0].mach {
				return Err(Error::drag_table(format!(
					"Mach values must be strictly increasing ({} then {})",
					pair[0].mach, pair[1].mach
				)));
			}
		}

		let mach: Vec<f64> = table.iter().map(|p| p.mach).collect();
		let k: Vec<f64> = table.iter().map(|p| p.cd * DRAG_CONST / bc).collect();
		let slope = knot_slopes(&mach, &k, method);

		Ok(Self {
			mach,
			k,
			slope,
			method,
		})
	}

	/// Build a curve with the default (PCHIP) method.
	///
	/// # Errors
	///
	/// Same as [`DragCurve::new`].
	pub fn from_table(table: &[DragDataPoint], bc: f64) -> Result<Self> {
		Self::new(table, bc, CurveMethod::default())
	}

	/// Drag acceleration coefficient at the given Mach number.
	///
	/// `mach` may exceed the table range; extrapolation holds the boundary
	/// slope and clamps at zero.
	#[must_use]
	pub fn drag_by_mach(&self, mach: f64) -> f64 {
		let n = self.mach.len();
		if n == 1 {
			return self.k[0];
		}

		// Below the first knot or above the last: hold the boundary slope.
		if mach <= self.mach[0] {
			let k = self.k[0] + self.slope[0] * (mach - self.mach[0]);
			return k.max(0.0);
		}
		if mach >= self.mach[n - 1] {
			let k = self.k[n - 1] + self.slope[n - 1] * (mach - self.mach[n - 1]);
			return k.max(0.0);
		}

		// First knot strictly greater than `mach`; the segment is [i-1, i].
		let i = self.mach.partition_point(|&m| m <= mach);
		let (lo, hi) = (i - 1, i);

		match self.method {
			CurveMethod::Pchip => hermite_eval(
				mach,
				self.mach[lo],
				self.mach[hi],
				self.k[lo],
				self.k[hi],
				self.slope[lo],
				self.slope[hi],
			),
			CurveMethod::Linear => interpolate_2_pt(
				mach,
				self.mach[lo],
				self.k[lo],
				self.mach[hi],
				self.k[hi],
			),
		}
	}

	/// Number of knots in the curve.
	#[must_use]
	pub fn len(&self) -> usize {
		self.mach.len()
	}

	/// Whether the curve has no knots. Always false for a built curve.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.mach.is_empty()
	}
}

/// Per-knot slopes for segment evaluation and boundary extrapolation.
///
/// PCHIP: Fritsch–Carlson limited slopes from each knot's neighbor triple.
/// Linear: boundary secants (interior entries unused by evaluation).
fn knot_slopes(mach: &[f64], k: &[f64], method: CurveMethod) -> Vec<f64> {
	let n = mach.len();
	if n == 1 {
		return vec![0.0];
	}
	if n == 2 || method == CurveMethod::Linear {
		let first = (k[1] - k[0]) / (mach[1] - mach[0]);
		let last = (k[n - 1] - k[n - 2]) / (mach[n - 1] - mach[n - 2]);
		let mut slopes = vec![0.0; n];
		slopes[0] = first;
		slopes[n - 1] = last;
		for i in 1..n - 1 {
			slopes[i] = (k[i + 1] - k[i - 1]) / (mach[i + 1] - mach[i - 1]);
		}
		return slopes;
	}

	let mut slopes = vec![0.0; n];
	let (m0, _, _) = pchip_slopes_three_points(mach[0], k[0], mach[1], k[1], mach[2], k[2]);
	slopes[0] = m0;
	for i in 1..n - 1 {
		let (_, m1, _) = pchip_slopes_three_points(
			mach[i - 1],
			k[i - 1],
			mach[i],
			k[i],
			mach[i + 1],
			k[i + 1],
		);
		slopes[i] = m1;
	}
	let (_, _, m2) = pchip_slopes_three_points(
		mach[n - 3],
		k[n - 3],
		mach[n - 2],
		k[n - 2],
		mach[n - 1],
		k[n - 1],
	);
	slopes[n - 1] = m2;
	slopes
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tables::{TABLE_G1, TABLE_G7};

	#[test]
	fn test_rejects_empty_table() {
		assert!(matches!(
			DragCurve::from_table(&[], 0.5),
			Err(Error::InvalidDragTable { .. })
		));
	}

	#[test]
	fn test_rejects_bad_bc() {
		assert!(matches!(
			DragCurve::from_table(TABLE_G1, 0.0),
			Err(Error::InvalidInput { .. })
		));
		assert!(matches!(
			DragCurve::from_table(TABLE_G1, f64::NAN),
			Err(Error::InvalidInput { .. })
		));
	}

	#[test]
	fn test_rejects_non_monotone_mach() {
		let table = [
			DragDataPoint::new(0.0, 0.2),
			DragDataPoint::new(1.0, 0.5),
			DragDataPoint::new(1.0, 0.6),
		];
		assert!(matches!(
			DragCurve::from_table(&table, 0.5),
			Err(Error::InvalidDragTable { .. })
		));
	}

	#[test]
	fn test_rejects_out_of_range_cd() {
		let low = [DragDataPoint::new(0.0, 0.0)];
		let high = [DragDataPoint::new(0.0, 2.5)];
		assert!(DragCurve::from_table(&low, 0.5).is_err());
		assert!(DragCurve::from_table(&high, 0.5).is_err());
	}

	#[test]
	fn test_knots_reproduced_exactly() {
		let bc = 0.365;
		for table in [TABLE_G1, TABLE_G7] {
			let curve = DragCurve::from_table(table, bc).unwrap();
			for point in table {
				let expected = point.cd * DRAG_CONST / bc;
				let got = curve.drag_by_mach(point.mach);
				assert!(
					(got - expected).abs() < 1e-12,
					"knot at Mach {} gave {got}, expected {expected}",
					point.mach
				);
			}
		}
	}

	#[test]
	fn test_linear_mode_matches_knots_and_midpoints() {
		let bc = 0.223;
		let curve = DragCurve::new(TABLE_G7, bc, CurveMethod::Linear).unwrap();
		for pair in TABLE_G7.windows(2) {
			let mid = 0.5 * (pair[0].mach + pair[1].mach);
			let expected = 0.5 * (pair[0].cd + pair[1].cd) * DRAG_CONST / bc;
			assert!((curve.drag_by_mach(mid) - expected).abs() < 1e-15);
		}
	}

	#[test]
	fn test_no_overshoot_on_monotone_segments() {
		let curve = DragCurve::from_table(TABLE_G1, 0.5).unwrap();
		// The G1 transonic rise 0.8..1.0 is steeply monotone; interpolated
		// values must stay within the knot bounds of each segment triple.
		for pair in TABLE_G1.windows(2) {
			let (a, b) = (pair[0], pair[1]);
			let (lo, hi) = if a.cd < b.cd { (a.cd, b.cd) } else { (b.cd, a.cd) };
			for i in 1..10 {
				let m = a.mach + (b.mach - a.mach) * f64::from(i) / 10.0;
				let k = curve.drag_by_mach(m) * 0.5 / DRAG_CONST;
				assert!(
					k >= lo - 1e-9 && k <= hi + 1e-9,
					"overshoot at Mach {m}: CD {k} outside [{lo}, {hi}]"
				);
			}
		}
	}

	#[test]
	fn test_extrapolation_close_to_endpoints() {
		let bc = 0.5;
		let curve = DragCurve::from_table(TABLE_G1, bc).unwrap();
		let last = TABLE_G1[TABLE_G1.len() - 1];
		let end_k = last.cd * DRAG_CONST / bc;

		// Within 1% of the endpoint Mach: within 3% of the endpoint value.
		let near = curve.drag_by_mach(last.mach * 1.01);
		assert!((near - end_k).abs() / end_k < 0.03);

		// Within ~15%: within 15%.
		let far = curve.drag_by_mach(last.mach * 1.15);
		assert!((far - end_k).abs() / end_k < 0.15);

		// Below the table start (Mach 0 is the G1 start, so probe a table
		// starting higher).
		let shifted: Vec<DragDataPoint> = TABLE_G1
			.iter()
			.map(|p| DragDataPoint::new(p.mach + 1.0, p.cd))
			.collect();
		let curve = DragCurve::from_table(&shifted, bc).unwrap();
		let first_k = shifted[0].cd * DRAG_CONST / bc;
		let below = curve.drag_by_mach(shifted[0].mach * 0.99);
		assert!((below - first_k).abs() / first_k < 0.03);
	}

	#[test]
	fn test_degenerate_tables() {
		let one = [DragDataPoint::new(1.0, 0.5)];
		let curve = DragCurve::from_table(&one, 0.5).unwrap();
		let k = 0.5 * DRAG_CONST / 0.5;
		assert!((curve.drag_by_mach(0.2) - k).abs() < 1e-15);
		assert!((curve.drag_by_mach(3.0) - k).abs() < 1e-15);

		let two = [DragDataPoint::new(1.0, 0.4), DragDataPoint::new(2.0, 0.6)];
		let curve = DragCurve::from_table(&two, 1.0).unwrap();
		let mid = curve.drag_by_mach(1.5);
		assert!((mid - 0.5 * DRAG_CONST).abs() < 1e-15);
	}
}
