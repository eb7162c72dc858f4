//! Trajectory integration engines.
//!
//! Steps the 3-D equations of motion under drag, gravity, and wind, and
//! emits interpolated samples at range marks, time marks, and requested
//! events. The stepping scheme is a closed set of methods selected by the
//! caller; all of them converge to the same trajectory as the step shrinks.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{Error, RangeCause, Result};
use crate::interpolate::{interpolate_2_pt, interpolate_3_pt};
use crate::shot::ShotProps;
use crate::trajectory::{HitResult, TrajFlag, TrajectoryData, calculate_energy, calculate_ogw};
use crate::vector::Vector3;

/// Gravitational acceleration, ft/s², downward.
pub(crate) const GRAVITY_FPS2: f64 = -32.17405;

/// Maximum length of one integration step at unit step multiplier, feet.
const MAX_CALC_STEP_FT: f64 = 1.0;

/// Steps allowed on top of the range-proportional budget before the
/// integration is declared non-convergent.
const STEP_BUDGET_FLOOR: usize = 10_000;

/// Samples closer than this in time are merged into one (their event flags
/// are OR-ed together).
const COINCIDENT_SAMPLE_S: f64 = 1e-9;

/// Stepping scheme. A closed set: no runtime engine discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationMethod {
	/// First-order semi-implicit Euler.
	Euler,

	/// Classic fourth-order Runge–Kutta.
	#[default]
	RungeKutta4,

	/// Velocity Verlet with a predicted velocity for the drag evaluation.
	VelocityVerlet,
}

/// Raw integration state between steps.
#[derive(Debug, Clone, Copy)]
struct RawState {
	time: f64,
	position: Vector3,
	velocity: Vector3,
	mach: f64,
	density_ratio: f64,
	speed_of_sound: f64,
}

/// Independent variable for raw-state interpolation.
#[derive(Clone, Copy, PartialEq, Eq)]
enum StateKey {
	Time,
	Distance,
}

/// Base step length in feet for a requested sampling step.
///
/// The sampling step is halved, then reduced by decades until it fits under
/// the maximum calculator step; the multiplier scales the result (larger is
/// coarser and faster).
pub(crate) fn calculation_step(dist_step: f64, step_multiplier: f64) -> f64 {
	let mut step = dist_step / 2.0;
	if step > MAX_CALC_STEP_FT {
		let order = step.log10().floor();
		let max_order = MAX_CALC_STEP_FT.log10().floor();
		step /= 10f64.powf(order - max_order + 1.0);
	}
	step * step_multiplier
}

/// Integrate a shot out to `max_range` feet.
///
/// Emits a sample at x = 0, at every `dist_step` multiple (interpolated to
/// exact distance), at every `time_step` multiple when `time_step` > 0, at
/// each requested event, and at exactly `max_range` on completion. Early
/// termination returns the partial trajectory with its [`RangeCause`]
/// attached; it is not an error.
///
/// # Errors
///
/// [`Error::InvalidInput`] for malformed range bounds or configuration.
#[allow(clippy::too_many_lines)]
pub fn integrate(
	props: &ShotProps,
	max_range: f64,
	dist_step: f64,
	flags: TrajFlag,
	time_step: f64,
	method: IntegrationMethod,
	config: &EngineConfig,
) -> Result<HitResult> {
	config.validate()?;
	if !max_range.is_finite() || max_range <= 0.0 {
		return Err(Error::input(format!(
			"max_range must be finite and positive, got {max_range}"
		)));
	}
	if !dist_step.is_finite() || dist_step <= 0.0 || dist_step > max_range {
		return Err(Error::input(format!(
			"dist_step must lie in (0, max_range], got {dist_step}"
		)));
	}
	if !time_step.is_finite() || time_step < 0.0 {
		return Err(Error::input(format!(
			"time_step must be finite and non-negative, got {time_step}"
		)));
	}

	let calc_step = calculation_step(dist_step, config.step_multiplier);
	let mut wind = props.wind_sock.clone();

	let (look_sin, look_cos) = props.look_angle.sin_cos();
	let (cant_sin, cant_cos) = props.cant_angle.sin_cos();
	let gravity = Vector3::new(0.0, GRAVITY_FPS2 * cant_cos, GRAVITY_FPS2 * cant_sin);

	let (elev_sin, elev_cos) = props.barrel_elevation.sin_cos();
	let (azim_sin, azim_cos) = props.barrel_azimuth.sin_cos();
	let direction = Vector3::new(elev_cos * azim_cos, elev_sin, elev_cos * azim_sin);

	let position = Vector3::new(0.0, -props.sight_height, 0.0);
	let (density_ratio, speed_of_sound) =
		props.density_and_mach_for_altitude(props.alt0 + position.y);
	let velocity = direction * props.muzzle_velocity;
	let mut state = RawState {
		time: 0.0,
		position,
		velocity,
		mach: velocity.magnitude() / speed_of_sound,
		density_ratio,
		speed_of_sound,
	};

	// The target point on the sight line, for closest-approach detection.
	// Ill-defined for a near-vertical sight line; the event is skipped then.
	let mrt_target = if flags.contains(TrajFlag::MRT) && look_cos.abs() > 1e-9 {
		Some(Vector3::new(max_range, max_range * look_sin / look_cos, 0.0))
	} else {
		None
	};

	let slant_height = |s: &RawState| s.position.y * look_cos - s.position.x * look_sin;
	let slant_rate = |s: &RawState| s.velocity.y * look_cos - s.velocity.x * look_sin;
	let mach_excess = |s: &RawState| s.velocity.magnitude() - s.speed_of_sound;
	let approach_rate = |s: &RawState, target: Vector3| (s.position - target).dot(s.velocity);

	let range_flag = if flags.contains(TrajFlag::RANGE) {
		TrajFlag::RANGE
	} else {
		TrajFlag::NONE
	};

	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	let step_budget = (max_range / calc_step).ceil() as usize * 8 + STEP_BUDGET_FLOOR;

	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	let mut samples: Vec<TrajectoryData> =
		Vec::with_capacity((max_range / dist_step).ceil() as usize + 8);
	samples.push(make_sample(props, &state, look_sin, look_cos, range_flag));

	let mut trail: Vec<RawState> = Vec::with_capacity(3);
	trail.push(state);

	let mut next_record_distance = dist_step;
	let mut next_record_time = if time_step > 0.0 { time_step } else { f64::INFINITY };
	let mut steps: usize = 0;
	let mut cause: Option<RangeCause> = None;
	let mut apex_seen = false;
	let mut mach_seen = false;
	let mut mrt_seen = false;

	loop {
		if state.position.x >= max_range {
			break;
		}
		let speed = state.velocity.magnitude();
		if speed < config.minimum_velocity {
			cause = Some(RangeCause::MinimumVelocityReached);
			break;
		}
		if state.position.y < config.maximum_drop {
			cause = Some(RangeCause::MaximumDropReached);
			break;
		}
		if let Some(floor) = config.minimum_altitude {
			if props.alt0 + state.position.y < floor {
				cause = Some(RangeCause::MinimumAltitudeReached);
				break;
			}
		}
		if steps >= step_budget {
			cause = Some(RangeCause::DidNotConverge);
			break;
		}
		steps += 1;

		let prev = state;
		state = advance(props, &mut wind, gravity, calc_step, method, &prev);
		if trail.len() == 3 {
			trail.remove(0);
		}
		trail.push(state);

		// Range and time marks crossed by this step.
		while state.position.x >= next_record_distance && next_record_distance <= max_range {
			let at = state_at(&trail, StateKey::Distance, next_record_distance);
			samples.push(make_sample(props, &at, look_sin, look_cos, range_flag));
			next_record_distance += dist_step;
		}
		while state.time >= next_record_time {
			let at = state_at(&trail, StateKey::Time, next_record_time);
			samples.push(make_sample(props, &at, look_sin, look_cos, TrajFlag::NONE));
			next_record_time += time_step;
		}

		// Event detection on the sign changes across this step.
		let (h0, h1) = (slant_height(&prev), slant_height(&state));
		if flags.contains(TrajFlag::ZERO_UP) && h0 < 0.0 && h1 >= 0.0 {
			emit_event(props, &trail, &mut samples, look_sin, look_cos, TrajFlag::ZERO_UP, &slant_height);
		}
		if flags.contains(TrajFlag::ZERO_DOWN) && h0 > 0.0 && h1 <= 0.0 {
			emit_event(props, &trail, &mut samples, look_sin, look_cos, TrajFlag::ZERO_DOWN, &slant_height);
		}
		if flags.contains(TrajFlag::APEX) && !apex_seen {
			let (r0, r1) = (slant_rate(&prev), slant_rate(&state));
			if r0 > 0.0 && r1 <= 0.0 {
				apex_seen = true;
				emit_event(props, &trail, &mut samples, look_sin, look_cos, TrajFlag::APEX, &slant_rate);
			}
		}
		if flags.contains(TrajFlag::MACH) && !mach_seen {
			let (m0, m1) = (mach_excess(&prev), mach_excess(&state));
			if m0 > 0.0 && m1 <= 0.0 {
				mach_seen = true;
				emit_event(props, &trail, &mut samples, look_sin, look_cos, TrajFlag::MACH, &mach_excess);
			}
		}
		if let Some(target) = mrt_target {
			if !mrt_seen {
				let (a0, a1) = (approach_rate(&prev, target), approach_rate(&state, target));
				if a0 < 0.0 && a1 >= 0.0 {
					mrt_seen = true;
					let rate = |s: &RawState| approach_rate(s, target);
					emit_event(props, &trail, &mut samples, look_sin, look_cos, TrajFlag::MRT, &rate);
				}
			}
		}
	}

	if cause.is_none() {
		// Reached the requested range: the last sample sits at exactly
		// max_range (a coincident range mark merges below).
		let at = state_at(&trail, StateKey::Distance, max_range);
		samples.push(make_sample(props, &at, look_sin, look_cos, range_flag));
	} else {
		// Partial trajectory: close with the termination state.
		samples.push(make_sample(props, &state, look_sin, look_cos, TrajFlag::NONE));
	}

	samples.sort_by(|a, b| a.time.total_cmp(&b.time));
	let mut merged: Vec<TrajectoryData> = Vec::with_capacity(samples.len());
	for sample in samples {
		match merged.last_mut() {
			Some(last) if (sample.time - last.time).abs() < COINCIDENT_SAMPLE_S => {
				last.flag |= sample.flag;
			},
			_ => merged.push(sample),
		}
	}

	Ok(HitResult {
		trajectory: merged,
		incomplete: cause,
	})
}

/// One integration step. Wind and air data are sampled once at the step's
/// start position and held fixed across substage evaluations.
fn advance(
	props: &ShotProps,
	wind: &mut crate::wind::WindSock,
	gravity: Vector3,
	calc_step: f64,
	method: IntegrationMethod,
	s: &RawState,
) -> RawState {
	let w = wind.vector_for_range(s.position.x);
	let (density_ratio, speed_of_sound) =
		props.density_and_mach_for_altitude(props.alt0 + s.position.y);

	let dt = calc_step / s.velocity.magnitude().max(1.0);
	let accel = |v: Vector3| -> Vector3 {
		let v_rel = v - w;
		let v_rel_mag = v_rel.magnitude();
		let k = props.drag_by_mach(v_rel_mag / speed_of_sound) * density_ratio;
		v_rel * (-k * v_rel_mag) + gravity
	};

	let (position, velocity) = match method {
		IntegrationMethod::Euler => {
			let v1 = s.velocity + accel(s.velocity) * dt;
			(s.position + v1 * dt, v1)
		},
		IntegrationMethod::RungeKutta4 => {
			let half = dt / 2.0;
			let k1v = accel(s.velocity);
			let k1p = s.velocity;
			let k2v = accel(s.velocity + k1v * half);
			let k2p = s.velocity + k1v * half;
			let k3v = accel(s.velocity + k2v * half);
			let k3p = s.velocity + k2v * half;
			let k4v = accel(s.velocity + k3v * dt);
			let k4p = s.velocity + k3v * dt;
			let sixth = dt / 6.0;
			(
				s.position + (k1p + k2p * 2.0 + k3p * 2.0 + k4p) * sixth,
				s.velocity + (k1v + k2v * 2.0 + k3v * 2.0 + k4v) * sixth,
			)
		},
		IntegrationMethod::VelocityVerlet => {
			let a1 = accel(s.velocity);
			let position = s.position + s.velocity * dt + a1 * (0.5 * dt * dt);
			let predicted = s.velocity + a1 * dt;
			let a2 = accel(predicted);
			(position, s.velocity + (a1 + a2) * (0.5 * dt))
		},
	};

	let (density_ratio, speed_of_sound) =
		props.density_and_mach_for_altitude(props.alt0 + position.y);
	RawState {
		time: s.time + dt,
		position,
		velocity,
		mach: velocity.magnitude() / speed_of_sound,
		density_ratio,
		speed_of_sound,
	}
}

/// Interpolate the raw state at an exact key value using the trailing
/// states: monotone cubic over three, linear over two.
fn state_at(trail: &[RawState], key: StateKey, value: f64) -> RawState {
	let n = trail.len();
	if n == 1 {
		return trail[0];
	}
	let kx = |s: &RawState| match key {
		StateKey::Time => s.time,
		StateKey::Distance => s.position.x,
	};
	let interp = |f: &dyn Fn(&RawState) -> f64| -> f64 {
		if n >= 3 {
			interpolate_3_pt(
				value,
				kx(&trail[n - 3]),
				f(&trail[n - 3]),
				kx(&trail[n - 2]),
				f(&trail[n - 2]),
				kx(&trail[n - 1]),
				f(&trail[n - 1]),
			)
		} else {
			interpolate_2_pt(
				value,
				kx(&trail[n - 2]),
				f(&trail[n - 2]),
				kx(&trail[n - 1]),
				f(&trail[n - 1]),
			)
		}
	};

	let position = Vector3::new(
		match key {
			StateKey::Distance => value,
			StateKey::Time => interp(&|s: &RawState| s.position.x),
		},
		interp(&|s: &RawState| s.position.y),
		interp(&|s: &RawState| s.position.z),
	);
	let velocity = Vector3::new(
		interp(&|s: &RawState| s.velocity.x),
		interp(&|s: &RawState| s.velocity.y),
		interp(&|s: &RawState| s.velocity.z),
	);
	RawState {
		time: match key {
			StateKey::Time => value,
			StateKey::Distance => interp(&|s: &RawState| s.time),
		},
		position,
		velocity,
		mach: interp(&|s: &RawState| s.mach),
		density_ratio: interp(&|s: &RawState| s.density_ratio),
		speed_of_sound: interp(&|s: &RawState| s.speed_of_sound),
	}
}

/// Emit one event sample at the root of `g` within the latest step.
fn emit_event(
	props: &ShotProps,
	trail: &[RawState],
	samples: &mut Vec<TrajectoryData>,
	look_sin: f64,
	look_cos: f64,
	flag: TrajFlag,
	g: &dyn Fn(&RawState) -> f64,
) {
	let time = event_time(trail, g);
	let at = state_at(trail, StateKey::Time, time);
	samples.push(make_sample(props, &at, look_sin, look_cos, flag));
}

/// Time at which `g` crosses zero within the latest step, by inverse
/// interpolation (cubic when the trailing values are monotone in `g`).
fn event_time(trail: &[RawState], g: &dyn Fn(&RawState) -> f64) -> f64 {
	let n = trail.len();
	let (a, b) = (&trail[n - 2], &trail[n - 1]);
	let (ga, gb) = (g(a), g(b));
	if n >= 3 {
		let c = &trail[n - 3];
		let gc = g(c);
		if (gc < ga && ga < gb) || (gc > ga && ga > gb) {
			return interpolate_3_pt(0.0, gc, c.time, ga, a.time, gb, b.time);
		}
	}
	if gb == ga {
		b.time
	} else {
		a.time + (0.0 - ga) * (b.time - a.time) / (gb - ga)
	}
}

/// Build a user-facing sample from a raw state.
fn make_sample(
	props: &ShotProps,
	s: &RawState,
	look_sin: f64,
	look_cos: f64,
	flag: TrajFlag,
) -> TrajectoryData {
	let velocity = s.velocity.magnitude();
	let distance = s.position.x;
	let windage = s.position.z + props.spin_drift(s.time);
	TrajectoryData {
		time: s.time,
		distance,
		velocity,
		mach: s.mach,
		height: s.position.y,
		slant_height: s.position.y * look_cos - s.position.x * look_sin,
		slant_distance: s.position.x * look_cos + s.position.y * look_sin,
		windage,
		drop_adjustment: correction(distance, s.position.y),
		windage_adjustment: correction(distance, windage),
		energy: calculate_energy(props.weight, velocity),
		ogw: calculate_ogw(props.weight, velocity),
		flag,
	}
}

/// Angular correction subtended by `offset` at `distance`; zero at the
/// muzzle where no correction is defined.
fn correction(distance: f64, offset: f64) -> f64 {
	if distance == 0.0 {
		0.0
	} else {
		(offset / distance).atan()
	}
}
