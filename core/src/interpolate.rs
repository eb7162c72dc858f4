//! Shared interpolation helpers.
//!
//! Two methods are used across the crate: two-point linear interpolation and
//! three-point monotone piecewise-cubic Hermite (PCHIP) with Fritsch–Carlson
//! slope limiting. The drag curve, the trajectory sampler, and the keyed
//! lookups all route through these functions.

/// Sign of a number: 1.0, -1.0, or 0.0.
fn sign(a: f64) -> f64 {
	if a > 0.0 {
		1.0
	} else if a < 0.0 {
		-1.0
	} else {
		0.0
	}
}

/// Fritsch–Carlson limited slopes at three ascending points.
///
/// The interior slope is the weighted harmonic mean of the adjacent secants
/// (zero when they disagree in sign), and the one-sided endpoint slopes are
/// clamped so the cubic cannot overshoot a monotone triple.
pub(crate) fn pchip_slopes_three_points(
	x0: f64,
	y0: f64,
	x1: f64,
	y1: f64,
	x2: f64,
	y2: f64,
) -> (f64, f64, f64) {
	let h0 = x1 - x0;
	let h1 = x2 - x1;
	debug_assert!(h0 > 0.0 && h1 > 0.0, "duplicate x-values in slope points");
	let d0 = (y1 - y0) / h0;
	let d1 = (y2 - y1) / h1;

	let m1 = if d0 == 0.0 || d1 == 0.0 || sign(d0) != sign(d1) {
		0.0
	} else {
		let w1 = 2.0 * h1 + h0;
		let w2 = h1 + 2.0 * h0;
		(w1 + w2) / (w1 / d0 + w2 / d1)
	};

	let mut m0 = ((2.0 * h0 + h1) * d0 - h0 * d1) / (h0 + h1);
	if sign(m0) != sign(d0) {
		m0 = 0.0;
	} else if m0.abs() > 3.0 * d0.abs() {
		m0 = 3.0 * d0;
	}

	let mut m2 = ((2.0 * h1 + h0) * d1 - h1 * d0) / (h0 + h1);
	if sign(m2) != sign(d1) {
		m2 = 0.0;
	} else if m2.abs() > 3.0 * d1.abs() {
		m2 = 3.0 * d1;
	}

	(m0, m1, m2)
}

/// Evaluate the cubic Hermite polynomial on `[xk, xk1]`.
pub(crate) fn hermite_eval(
	x: f64,
	xk: f64,
	xk1: f64,
	yk: f64,
	yk1: f64,
	mk: f64,
	mk1: f64,
) -> f64 {
	let h = xk1 - xk;
	if h == 0.0 {
		return yk;
	}
	let t = (x - xk) / h;
	let t2 = t * t;
	let t3 = t2 * t;
	let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
	let h10 = t3 - 2.0 * t2 + t;
	let h01 = -2.0 * t3 + 3.0 * t2;
	let h11 = t3 - t2;
	h00 * yk + h * h10 * mk + h01 * yk1 + h * h11 * mk1
}

/// Monotone PCHIP interpolation through three points.
///
/// Points may be passed in any x-order; they are sorted internally. Within a
/// monotone triple the result never overshoots the bracketing y-values.
#[must_use]
pub fn interpolate_3_pt(x: f64, x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
	let mut pts = [(x0, y0), (x1, y1), (x2, y2)];
	pts.sort_by(|a, b| a.0.total_cmp(&b.0));
	let [(x0, y0), (x1, y1), (x2, y2)] = pts;

	if x1 == x0 || x2 == x1 {
		// Degenerate spacing: fall back to the widest usable pair.
		return if x2 != x0 {
			interpolate_2_pt(x, x0, y0, x2, y2)
		} else {
			y0
		};
	}

	let (m0, m1, m2) = pchip_slopes_three_points(x0, y0, x1, y1, x2, y2);
	if x <= x1 {
		hermite_eval(x, x0, x1, y0, y1, m0, m1)
	} else {
		hermite_eval(x, x1, x2, y1, y2, m1, m2)
	}
}

/// Linear interpolation between two points.
#[must_use]
pub fn interpolate_2_pt(x: f64, x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
	if x1 == x0 {
		return y0;
	}
	let t = (x - x0) / (x1 - x0);
	y0 + t * (y1 - y0)
}
