//! Re-entrancy: independent integrations on parallel threads must agree
//! with the serial result exactly.

use rayon::prelude::*;

use trajcalc_core::{
	Ammo, DragModel, EngineConfig, IntegrationMethod, Shot, ShotProps, TABLE_G7, TrajFlag,
	WindSegment, Weapon, integrate,
};

#[test]
fn test_parallel_integrations_match_serial() {
	let config = EngineConfig::default();
	let dm = DragModel::with_dimensions(0.223, TABLE_G7, 168.0, 0.308, 1.282);
	let ammo = Ammo::new(dm, 2750.0);
	let mut shot = Shot::new(ammo, Weapon::new(2.0 / 12.0, 11.24));
	shot.relative_angle = 0.001228;
	shot.winds = vec![WindSegment::new(7.33, (-45.0_f64).to_radians(), 30_000.0)];
	let props = ShotProps::from_shot(&shot, &config).unwrap();

	let serial = integrate(
		&props,
		3000.0,
		300.0,
		TrajFlag::ALL,
		0.0,
		IntegrationMethod::RungeKutta4,
		&config,
	)
	.unwrap();

	let parallel: Vec<_> = (0..8)
		.into_par_iter()
		.map(|_| {
			let local = props.clone();
			integrate(
				&local,
				3000.0,
				300.0,
				TrajFlag::ALL,
				0.0,
				IntegrationMethod::RungeKutta4,
				&config,
			)
			.unwrap()
		})
		.collect();

	for hit in &parallel {
		assert_eq!(hit.trajectory.len(), serial.trajectory.len());
		for (a, b) in hit.trajectory.iter().zip(serial.trajectory.iter()) {
			assert_eq!(a.time.to_bits(), b.time.to_bits());
			assert_eq!(a.height.to_bits(), b.height.to_bits());
			assert_eq!(a.windage.to_bits(), b.windage.to_bits());
			assert_eq!(a.flag, b.flag);
		}
	}
}

#[test]
fn test_distinct_shots_in_parallel() {
	// Different elevations integrated concurrently stay independent: each
	// result matches its own serial rerun.
	let config = EngineConfig::default();
	let dm = DragModel::new(0.365, trajcalc_core::TABLE_G1);
	let ammo = Ammo::new(dm, 2600.0);
	let shot = Shot::new(ammo, Weapon::new(3.2 / 12.0, 0.0));
	let props = ShotProps::from_shot(&shot, &config).unwrap();

	let elevations: Vec<f64> = (1..=6).map(|i| f64::from(i) * 2e-3).collect();
	let parallel: Vec<_> = elevations
		.par_iter()
		.map(|&elevation| {
			integrate(
				&props.with_elevation(elevation),
				3000.0,
				300.0,
				TrajFlag::NONE,
				0.0,
				IntegrationMethod::RungeKutta4,
				&config,
			)
			.unwrap()
		})
		.collect();

	for (hit, &elevation) in parallel.iter().zip(elevations.iter()) {
		let serial = integrate(
			&props.with_elevation(elevation),
			3000.0,
			300.0,
			TrajFlag::NONE,
			0.0,
			IntegrationMethod::RungeKutta4,
			&config,
		)
		.unwrap();
		assert_eq!(hit.trajectory.len(), serial.trajectory.len());
		for (a, b) in hit.trajectory.iter().zip(serial.trajectory.iter()) {
			assert_eq!(a.height.to_bits(), b.height.to_bits());
			assert_eq!(a.velocity.to_bits(), b.velocity.to_bits());
		}
	}
}
