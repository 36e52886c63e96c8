//! Step loop shared by both engine variants
//!
//! Each step records the current pressure, evaluates the backwash policy,
//! then advances pressure by the trend plus a uniform perturbation and clamps
//! it to the floor. Recording happens before the trigger check, so
//! `pressure_data[i]` is the pre-backwash pressure at step `i`.

use tracing::debug;

use super::backwash::{BackwashPolicy, SimulationState};
use super::noise::NoiseSource;
use super::trend::{compute_trend, initial_pressure, initial_trend, TrendMode};
use crate::types::{BackwashEvent, CurveSet, FoulingStatus, ParameterSet};

/// Half-width of the per-step uniform pressure perturbation (PSIG).
pub const PERTURBATION: f64 = 0.1;

/// Raw output of the step loop, before metrics and rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub pressure_data: Vec<f64>,
    pub backwash_points: Vec<BackwashEvent>,
    /// Parameters in effect at the final step (the base set if no steps ran)
    pub final_parameters: ParameterSet,
}

/// Constant parameters for every step. Trend is fixed at start with the flow
/// factor and afterwards only damped by backwashes.
pub fn simulate_single_curve(
    parameters: &ParameterSet,
    fouling: &FoulingStatus,
    time_steps: usize,
    threshold: f64,
    noise: &mut dyn NoiseSource,
) -> Trajectory {
    let schedule = vec![*parameters; time_steps];
    let policy = BackwashPolicy::new(threshold, true);
    drive(&schedule, parameters, fouling, TrendMode::HeldWithFlowFactor, policy, noise)
}

/// Turbidity, pH and temperature follow the padded curves. Trend is
/// recomputed every step and backwashes only drop pressure.
pub fn simulate_curve_driven(
    base: &ParameterSet,
    curves: &CurveSet,
    fouling: &FoulingStatus,
    time_steps: usize,
    threshold: f64,
    noise: &mut dyn NoiseSource,
) -> Trajectory {
    let schedule = curves.resample(base, time_steps);
    let policy = BackwashPolicy::new(threshold, false);
    drive(&schedule, base, fouling, TrendMode::PerStepWithoutFlow, policy, noise)
}

fn drive(
    schedule: &[ParameterSet],
    base: &ParameterSet,
    fouling: &FoulingStatus,
    mode: TrendMode,
    policy: BackwashPolicy,
    noise: &mut dyn NoiseSource,
) -> Trajectory {
    let Some(first) = schedule.first() else {
        return Trajectory {
            pressure_data: Vec::new(),
            backwash_points: Vec::new(),
            final_parameters: *base,
        };
    };

    let mut state = SimulationState::new(
        initial_pressure(first.turbidity),
        initial_trend(mode, first, fouling),
    );
    let mut pressure_data = Vec::with_capacity(schedule.len());
    let mut backwash_points = Vec::new();

    for (step, params) in schedule.iter().enumerate() {
        pressure_data.push(state.current_pressure);

        if mode == TrendMode::PerStepWithoutFlow {
            state.trend = compute_trend(params, fouling);
        }

        if let Some(event) = policy.maybe_trigger(&state, params, fouling, step, noise) {
            debug!(
                step,
                pressure = event.pressure,
                intensity = event.intensity,
                duration = event.duration,
                "Backwash triggered"
            );
            policy.apply_event(&mut state, &event);
            backwash_points.push(event);
        }

        state.advance(noise.uniform(-PERTURBATION, PERTURBATION));
    }

    Trajectory {
        pressure_data,
        backwash_points,
        final_parameters: schedule.last().copied().unwrap_or(*base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics_engine::backwash::MIN_PRESSURE;
    use crate::physics_engine::noise::{RandNoise, ScriptedNoise};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_reference_scenario_without_noise() {
        // 5.0 + 0.4 per step reaches 7.0 at step 5
        let mut noise = ScriptedNoise::quiet();
        let traj = simulate_single_curve(&ParameterSet::default(), &FoulingStatus::Clean, 20, 7.0, &mut noise);

        assert_eq!(traj.pressure_data.len(), 20);
        assert!((traj.pressure_data[0] - 5.0).abs() < EPS);
        assert!((traj.pressure_data[4] - 6.6).abs() < EPS);

        let first = &traj.backwash_points[0];
        assert_eq!(first.time_step, 5);
        assert!((first.pressure - 7.0).abs() < EPS);
        assert_eq!(first.duration, 140);
        // pressure sample after the trigger reflects the halving plus one trend step
        let damped = 0.4 * (0.9 - (0.0 / 10.0 + 140.0 / 300.0) / 2.0 * 0.2);
        assert!((traj.pressure_data[6] - (3.5 + damped)).abs() < 1e-6);
    }

    #[test]
    fn test_length_and_floor_hold_for_random_runs() {
        let params = ParameterSet {
            turbidity: 2.0,
            ph: 4.0,
            temperature: 35.0,
            flow_rate: 50.0,
            inlet_pressure: 80.0,
        };
        for seed in 0..25 {
            let mut noise = RandNoise::seeded(seed);
            let traj = simulate_single_curve(&params, &FoulingStatus::Critical, 50, 3.0, &mut noise);
            assert_eq!(traj.pressure_data.len(), 50);
            assert!(traj.pressure_data.iter().all(|p| *p >= MIN_PRESSURE));
            for pair in traj.backwash_points.windows(2) {
                assert!(pair[1].time_step - pair[0].time_step >= 5);
            }
        }
    }

    #[test]
    fn test_single_step_never_triggers() {
        let mut noise = ScriptedNoise::quiet();
        let params = ParameterSet { turbidity: 2.0, ..ParameterSet::default() };
        // starts at 8.0, above threshold, but step 0 is inside the initial cooldown
        let traj = simulate_single_curve(&params, &FoulingStatus::Clean, 1, 7.0, &mut noise);
        assert_eq!(traj.pressure_data, vec![8.0]);
        assert!(traj.backwash_points.is_empty());
    }

    #[test]
    fn test_zero_steps_is_empty() {
        let mut noise = ScriptedNoise::quiet();
        let traj = simulate_single_curve(&ParameterSet::default(), &FoulingStatus::Clean, 0, 7.0, &mut noise);
        assert!(traj.pressure_data.is_empty());
        assert_eq!(traj.final_parameters, ParameterSet::default());
    }

    #[test]
    fn test_curve_driven_pads_short_curves() {
        let curves = CurveSet {
            turbidity_curve: vec![1.0, 1.2],
            ..CurveSet::default()
        };
        let base = ParameterSet::default();
        let mut noise = ScriptedNoise::quiet();
        let traj = simulate_curve_driven(&base, &curves, &FoulingStatus::Clean, 12, 7.0, &mut noise);

        assert_eq!(traj.pressure_data.len(), 12);
        // initial pressure comes from the first curve value
        assert!((traj.pressure_data[0] - 6.0).abs() < EPS);
        assert_eq!(traj.final_parameters.turbidity, base.turbidity);
    }

    #[test]
    fn test_curve_driven_truncates_long_curves() {
        let curves = CurveSet {
            temperature_curve: (0..40u32).map(|i| 20.0 + f64::from(i) * 0.1).collect(),
            ..CurveSet::default()
        };
        let mut noise = ScriptedNoise::quiet();
        let traj = simulate_curve_driven(&ParameterSet::default(), &curves, &FoulingStatus::Mild, 5, 7.0, &mut noise);
        assert_eq!(traj.pressure_data.len(), 5);
        assert!((traj.final_parameters.temperature - 20.4).abs() < EPS);
    }

    #[test]
    fn test_curve_driven_backwash_does_not_damp_trend() {
        // Constant curves and zero noise: after a backwash the climb rate is unchanged.
        let mut noise = ScriptedNoise::quiet();
        let traj = simulate_curve_driven(
            &ParameterSet::default(),
            &CurveSet::default(),
            &FoulingStatus::Clean,
            12,
            7.0,
            &mut noise,
        );
        let event = &traj.backwash_points[0];
        assert_eq!(event.time_step, 5);
        let after = traj.pressure_data[event.time_step + 2] - traj.pressure_data[event.time_step + 1];
        assert!((after - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_curve_driven_ignores_flow_rate() {
        let fast = ParameterSet { flow_rate: 50.0, ..ParameterSet::default() };
        let mut a = ScriptedNoise::quiet();
        let mut b = ScriptedNoise::quiet();
        let slow_run = simulate_curve_driven(&ParameterSet::default(), &CurveSet::default(), &FoulingStatus::Clean, 10, 7.0, &mut a);
        let fast_run = simulate_curve_driven(&fast, &CurveSet::default(), &FoulingStatus::Clean, 10, 7.0, &mut b);
        assert_eq!(slow_run.pressure_data, fast_run.pressure_data);
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let mut a = RandNoise::seeded(99);
        let mut b = RandNoise::seeded(99);
        let params = ParameterSet { turbidity: 1.4, ..ParameterSet::default() };
        let x = simulate_single_curve(&params, &FoulingStatus::Severe, 30, 7.0, &mut a);
        let y = simulate_single_curve(&params, &FoulingStatus::Severe, 30, 7.0, &mut b);
        assert_eq!(x, y);
    }
}
