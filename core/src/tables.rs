//! Standard drag-function tables.
//!
//! Tabulated `(Mach, CD)` data for the G1 (flat-base) and G7 (boat-tail)
//! standard projectiles. Callers with custom or multi-BC drag data supply
//! their own `(Mach, CD)` table instead; anything expressible as a list of
//! points builds a [`DragCurve`](crate::drag::DragCurve) the same way.

use crate::drag::DragDataPoint;

/// G1 standard projectile (flat base, blunt nose).
pub const TABLE_G1: &[DragDataPoint] = &[
	DragDataPoint::new(0.00, 0.2629),
	DragDataPoint::new(0.05, 0.2558),
	DragDataPoint::new(0.10, 0.2487),
	DragDataPoint::new(0.15, 0.2413),
	DragDataPoint::new(0.20, 0.2344),
	DragDataPoint::new(0.25, 0.2278),
	DragDataPoint::new(0.30, 0.2214),
	DragDataPoint::new(0.35, 0.2155),
	DragDataPoint::new(0.40, 0.2104),
	DragDataPoint::new(0.45, 0.2061),
	DragDataPoint::new(0.50, 0.2032),
	DragDataPoint::new(0.55, 0.2020),
	DragDataPoint::new(0.60, 0.2034),
	DragDataPoint::new(0.70, 0.2165),
	DragDataPoint::new(0.725, 0.2230),
	DragDataPoint::new(0.75, 0.2313),
	DragDataPoint::new(0.775, 0.2417),
	DragDataPoint::new(0.80, 0.2546),
	DragDataPoint::new(0.825, 0.2706),
	DragDataPoint::new(0.85, 0.2901),
	DragDataPoint::new(0.875, 0.3136),
	DragDataPoint::new(0.90, 0.3415),
	DragDataPoint::new(0.925, 0.3734),
	DragDataPoint::new(0.95, 0.4084),
	DragDataPoint::new(0.975, 0.4448),
	DragDataPoint::new(1.0, 0.4805),
	DragDataPoint::new(1.025, 0.5136),
	DragDataPoint::new(1.05, 0.5427),
	DragDataPoint::new(1.075, 0.5677),
	DragDataPoint::new(1.10, 0.5883),
	DragDataPoint::new(1.125, 0.6053),
	DragDataPoint::new(1.15, 0.6191),
	DragDataPoint::new(1.20, 0.6393),
	DragDataPoint::new(1.25, 0.6518),
	DragDataPoint::new(1.30, 0.6589),
	DragDataPoint::new(1.35, 0.6621),
	DragDataPoint::new(1.40, 0.6625),
	DragDataPoint::new(1.45, 0.6607),
	DragDataPoint::new(1.50, 0.6573),
	DragDataPoint::new(1.55, 0.6528),
	DragDataPoint::new(1.60, 0.6474),
	DragDataPoint::new(1.65, 0.6413),
	DragDataPoint::new(1.70, 0.6347),
	DragDataPoint::new(1.75, 0.6280),
	DragDataPoint::new(1.80, 0.6210),
	DragDataPoint::new(1.85, 0.6141),
	DragDataPoint::new(1.90, 0.6072),
	DragDataPoint::new(1.95, 0.6003),
	DragDataPoint::new(2.00, 0.5934),
	DragDataPoint::new(2.05, 0.5867),
	DragDataPoint::new(2.10, 0.5804),
	DragDataPoint::new(2.15, 0.5743),
	DragDataPoint::new(2.20, 0.5685),
	DragDataPoint::new(2.25, 0.5630),
	DragDataPoint::new(2.30, 0.5577),
	DragDataPoint::new(2.35, 0.5527),
	DragDataPoint::new(2.40, 0.5481),
	DragDataPoint::new(2.45, 0.5438),
	DragDataPoint::new(2.50, 0.5397),
	DragDataPoint::new(2.60, 0.5325),
	DragDataPoint::new(2.70, 0.5264),
	DragDataPoint::new(2.80, 0.5211),
	DragDataPoint::new(2.90, 0.5168),
	DragDataPoint::new(3.00, 0.5133),
	DragDataPoint::new(3.10, 0.5105),
	DragDataPoint::new(3.20, 0.5084),
	DragDataPoint::new(3.30, 0.5067),
	DragDataPoint::new(3.40, 0.5054),
	DragDataPoint::new(3.50, 0.5040),
	DragDataPoint::new(3.60, 0.5030),
	DragDataPoint::new(3.70, 0.5022),
	DragDataPoint::new(3.80, 0.5016),
	DragDataPoint::new(3.90, 0.5010),
	DragDataPoint::new(4.00, 0.5006),
	DragDataPoint::new(4.20, 0.4998),
	DragDataPoint::new(4.40, 0.4995),
	DragDataPoint::new(4.60, 0.4992),
	DragDataPoint::new(4.80, 0.4990),
	DragDataPoint::new(5.00, 0.4988),
];

/// G7 standard projectile (long boat-tail, secant ogive).
pub const TABLE_G7: &[DragDataPoint] = &[
	DragDataPoint::new(0.00, 0.1198),
	DragDataPoint::new(0.05, 0.1197),
	DragDataPoint::new(0.10, 0.1196),
	DragDataPoint::new(0.15, 0.1194),
	DragDataPoint::new(0.20, 0.1193),
	DragDataPoint::new(0.25, 0.1194),
	DragDataPoint::new(0.30, 0.1194),
	DragDataPoint::new(0.35, 0.1194),
	DragDataPoint::new(0.40, 0.1193),
	DragDataPoint::new(0.45, 0.1193),
	DragDataPoint::new(0.50, 0.1194),
	DragDataPoint::new(0.55, 0.1193),
	DragDataPoint::new(0.60, 0.1194),
	DragDataPoint::new(0.65, 0.1197),
	DragDataPoint::new(0.70, 0.1202),
	DragDataPoint::new(0.725, 0.1207),
	DragDataPoint::new(0.75, 0.1215),
	DragDataPoint::new(0.775, 0.1226),
	DragDataPoint::new(0.80, 0.1242),
	DragDataPoint::new(0.825, 0.1266),
	DragDataPoint::new(0.85, 0.1306),
	DragDataPoint::new(0.875, 0.1368),
	DragDataPoint::new(0.90, 0.1464),
	DragDataPoint::new(0.925, 0.1660),
	DragDataPoint::new(0.95, 0.2054),
	DragDataPoint::new(0.975, 0.2993),
	DragDataPoint::new(1.0, 0.3803),
	DragDataPoint::new(1.025, 0.4015),
	DragDataPoint::new(1.05, 0.4043),
	DragDataPoint::new(1.075, 0.4034),
	DragDataPoint::new(1.10, 0.4014),
	DragDataPoint::new(1.125, 0.3987),
	DragDataPoint::new(1.15, 0.3955),
	DragDataPoint::new(1.20, 0.3884),
	DragDataPoint::new(1.25, 0.3810),
	DragDataPoint::new(1.30, 0.3732),
	DragDataPoint::new(1.35, 0.3657),
	DragDataPoint::new(1.40, 0.3580),
	DragDataPoint::new(1.45, 0.3508),
	DragDataPoint::new(1.50, 0.3440),
	DragDataPoint::new(1.55, 0.3376),
	DragDataPoint::new(1.60, 0.3315),
	DragDataPoint::new(1.65, 0.3260),
	DragDataPoint::new(1.70, 0.3209),
	DragDataPoint::new(1.75, 0.3160),
	DragDataPoint::new(1.80, 0.3117),
	DragDataPoint::new(1.85, 0.3078),
	DragDataPoint::new(1.90, 0.3042),
	DragDataPoint::new(1.95, 0.3010),
	DragDataPoint::new(2.00, 0.2980),
	DragDataPoint::new(2.05, 0.2951),
	DragDataPoint::new(2.10, 0.2922),
	DragDataPoint::new(2.15, 0.2892),
	DragDataPoint::new(2.20, 0.2864),
	DragDataPoint::new(2.25, 0.2835),
	DragDataPoint::new(2.30, 0.2807),
	DragDataPoint::new(2.35, 0.2779),
	DragDataPoint::new(2.40, 0.2752),
	DragDataPoint::new(2.45, 0.2725),
	DragDataPoint::new(2.50, 0.2697),
	DragDataPoint::new(2.55, 0.2670),
	DragDataPoint::new(2.60, 0.2643),
	DragDataPoint::new(2.65, 0.2615),
	DragDataPoint::new(2.70, 0.2588),
	DragDataPoint::new(2.75, 0.2561),
	DragDataPoint::new(2.80, 0.2533),
	DragDataPoint::new(2.85, 0.2506),
	DragDataPoint::new(2.90, 0.2479),
	DragDataPoint::new(2.95, 0.2451),
	DragDataPoint::new(3.00, 0.2424),
	DragDataPoint::new(3.10, 0.2368),
	DragDataPoint::new(3.20, 0.2313),
	DragDataPoint::new(3.30, 0.2258),
	DragDataPoint::new(3.40, 0.2205),
	DragDataPoint::new(3.50, 0.2154),
	DragDataPoint::new(3.60, 0.2106),
	DragDataPoint::new(3.70, 0.2060),
	DragDataPoint::new(3.80, 0.2017),
	DragDataPoint::new(3.90, 0.1975),
	DragDataPoint::new(4.00, 0.1935),
	DragDataPoint::new(4.20, 0.1861),
	DragDataPoint::new(4.40, 0.1793),
	DragDataPoint::new(4.60, 0.1730),
	DragDataPoint::new(4.80, 0.1672),
	DragDataPoint::new(5.00, 0.1618),
];

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_tables_strictly_increasing_in_mach() {
		for table in [TABLE_G1, TABLE_G7] {
			for pair in table.windows(2) {
				assert!(pair[0].mach < pair[1].mach);
			}
		}
	}

	#[test]
	fn test_tables_cd_in_valid_range() {
		for table in [TABLE_G1, TABLE_G7] {
			for point in table {
				assert!(point.cd > 0.0 && point.cd < 2.0);
			}
		}
	}

	#[test]
	fn test_transonic_peaks() {
		// G1 peaks just above Mach 1.4, G7 just above Mach 1.0.
		let g1_max = TABLE_G1
			.iter()
			.max_by(|a, b| a.cd.total_cmp(&b.cd))
			.unwrap();
		assert!((g1_max.mach - 1.40).abs() < 1e-9);
		let g7_max = TABLE_G7
			.iter()
			.max_by(|a, b| a.cd.total_cmp(&b.cd))
			.unwrap();
		assert!((g7_max.mach - 1.05).abs() < 1e-9);
	}
}
