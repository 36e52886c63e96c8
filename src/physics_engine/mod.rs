//! Physics Engine Module
//!
//! Deterministic-given-noise simulation of transmembrane pressure in a UF
//! membrane, with a stateful backwash policy and post-run diagnostics.
//! No I/O, no clock, no shared state: each call owns its simulation state
//! and the caller supplies the random source.
//!
//! ## Entry points
//! - `run_basic()` - constant parameters, caller-chosen threshold
//! - `run_with_curves()` - turbidity/pH/temperature curves, threshold fixed at 7.0
//!
//! ## Components
//! - `trend` - per-step pressure drift
//! - `backwash` - trigger rule, intensity and post-trigger effects
//! - `simulator` - the step loop
//! - `metrics` - fouling rate, efficiency and recommendations
//! - `noise` - injectable random source
//!
//! Inputs are expected to be range-checked by `validation` first; the engine
//! never rejects a parameter set.

pub mod backwash;
pub mod metrics;
pub mod noise;
pub mod simulator;
pub mod trend;

pub use backwash::{
    round_to, BackwashPolicy, SimulationState, BACKWASH_DURATIONS_SECS, COOLDOWN_STEPS, MIN_PRESSURE,
};
pub use metrics::{efficiency, fouling_rate, generate_recommendations};
pub use noise::{NoiseSource, RandNoise};
pub use simulator::{simulate_curve_driven, simulate_single_curve, Trajectory};
pub use trend::{compute_trend, flow_factor, TrendMode};

use crate::types::{CurveSet, EngineVariant, FoulingStatus, ParameterSet, PredictionResult};

/// Threshold used by the curve-driven entry point (PSIG).
pub const CURVE_DRIVEN_THRESHOLD: f64 = 7.0;

/// Simulate with constant parameters.
pub fn run_basic(
    parameters: &ParameterSet,
    fouling: &FoulingStatus,
    time_steps: usize,
    pressure_threshold: f64,
    noise: &mut dyn NoiseSource,
) -> PredictionResult {
    let trajectory = simulate_single_curve(parameters, fouling, time_steps, pressure_threshold, noise);
    finish(trajectory, fouling, EngineVariant::SingleCurve)
}

/// Simulate with per-step water-quality curves over `base`.
pub fn run_with_curves(
    base: &ParameterSet,
    curves: &CurveSet,
    fouling: &FoulingStatus,
    time_steps: usize,
    noise: &mut dyn NoiseSource,
) -> PredictionResult {
    let trajectory = simulate_curve_driven(base, curves, fouling, time_steps, CURVE_DRIVEN_THRESHOLD, noise);
    finish(trajectory, fouling, EngineVariant::CurveDriven)
}

/// Derive metrics from the raw trajectory and round the reported values.
///
/// Metrics are computed on unrounded pressures; recommendations see the
/// parameters of the final step.
fn finish(trajectory: Trajectory, fouling: &FoulingStatus, variant: EngineVariant) -> PredictionResult {
    let rate = fouling_rate(&trajectory.pressure_data);
    let eff = efficiency(&trajectory.pressure_data, &trajectory.backwash_points);
    let recommendations = generate_recommendations(
        &trajectory.final_parameters,
        fouling,
        trajectory.backwash_points.len(),
        eff,
    );

    PredictionResult {
        pressure_data: trajectory.pressure_data.iter().map(|p| round_to(*p, 2)).collect(),
        backwash_points: trajectory.backwash_points,
        fouling_rate: round_to(rate, 3),
        efficiency: round_to(eff, 3),
        recommendations,
        confidence_score: variant.confidence_score(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics_engine::noise::ScriptedNoise;

    #[test]
    fn test_run_basic_reference_scenario() {
        let mut noise = ScriptedNoise::quiet();
        let result = run_basic(&ParameterSet::default(), &FoulingStatus::Clean, 20, 7.0, &mut noise);

        assert_eq!(result.pressure_data.len(), 20);
        assert_eq!(result.pressure_data[0], 5.0);
        assert_eq!(result.pressure_data[1], 5.4);
        assert_eq!(result.confidence_score, 0.9);
        assert!(result.backwash_count() >= 1);
        assert!(result.fouling_rate > 0.0);
        assert!((0.5..=1.0).contains(&result.efficiency));
        assert!(!result.recommendations.is_empty());
    }

    #[test]
    fn test_low_threshold_keeps_fixed_intensity_reference() {
        let mut noise = ScriptedNoise::quiet();
        let result = run_basic(&ParameterSet::default(), &FoulingStatus::Clean, 10, 3.0, &mut noise);

        let first = &result.backwash_points[0];
        assert_eq!(first.time_step, 4);
        assert!((first.pressure - 6.6).abs() < 1e-9);
        assert_eq!(first.intensity, -0.6);
    }

    #[test]
    fn test_run_basic_single_step() {
        let mut noise = ScriptedNoise::quiet();
        let result = run_basic(&ParameterSet::default(), &FoulingStatus::Clean, 1, 7.0, &mut noise);
        assert_eq!(result.pressure_data, vec![5.0]);
        assert!(result.backwash_points.is_empty());
        assert_eq!(result.fouling_rate, 0.0);
        assert_eq!(result.efficiency, 1.0);
    }

    #[test]
    fn test_unknown_status_matches_clean() {
        let params = ParameterSet { turbidity: 1.1, ..ParameterSet::default() };
        let mut a = RandNoise::seeded(5);
        let mut b = RandNoise::seeded(5);
        let clean = run_basic(&params, &FoulingStatus::Clean, 30, 7.0, &mut a);
        let unknown = run_basic(&params, &FoulingStatus::from_label("mystery"), 30, 7.0, &mut b);
        assert_eq!(clean, unknown);
    }

    #[test]
    fn test_run_with_curves_uses_fixed_threshold_and_confidence() {
        let curves = CurveSet {
            turbidity_curve: vec![0.5; 3],
            ..CurveSet::default()
        };
        let mut noise = ScriptedNoise::quiet();
        let result = run_with_curves(&ParameterSet::default(), &curves, &FoulingStatus::Clean, 20, &mut noise);
        assert_eq!(result.pressure_data.len(), 20);
        assert_eq!(result.confidence_score, 0.85);
        assert!(result.backwash_points.iter().all(|e| e.pressure >= CURVE_DRIVEN_THRESHOLD));
    }

    #[test]
    fn test_recommendations_use_last_curve_step() {
        // Only the final step is hot; the high-temperature advice must still fire.
        let curves = CurveSet {
            temperature_curve: vec![25.0, 25.0, 25.0, 33.0],
            ..CurveSet::default()
        };
        let mut noise = ScriptedNoise::quiet();
        let result = run_with_curves(&ParameterSet::default(), &curves, &FoulingStatus::Clean, 4, &mut noise);
        assert!(result
            .recommendations
            .iter()
            .any(|r| r == metrics::REC_HIGH_TEMPERATURE));
    }

    #[test]
    fn test_reported_values_are_rounded() {
        let mut noise = RandNoise::seeded(17);
        let result = run_basic(&ParameterSet::default(), &FoulingStatus::Moderate, 25, 7.0, &mut noise);
        for p in &result.pressure_data {
            assert!(((p * 100.0).round() - p * 100.0).abs() < 1e-6, "{p} not rounded to 2 dp");
        }
        assert!(((result.fouling_rate * 1000.0).round() - result.fouling_rate * 1000.0).abs() < 1e-6);
    }
}
