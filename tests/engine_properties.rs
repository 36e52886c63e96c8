//! Engine Property Tests
//!
//! Invariants of the prediction engine that must hold for any seed:
//! trajectory length, the pressure floor, the backwash cooldown, the
//! efficiency bounds and reproducibility under a fixed seed.

use uf_backwash::physics_engine::{self, RandNoise, COOLDOWN_STEPS, MIN_PRESSURE};
use uf_backwash::types::{CurveSet, EngineVariant, FoulingStatus, ParameterSet, PredictionResult};

fn harsh_parameters() -> ParameterSet {
    ParameterSet {
        turbidity: 2.0,
        ph: 4.0,
        temperature: 35.0,
        flow_rate: 50.0,
        inlet_pressure: 80.0,
    }
}

fn basic(params: &ParameterSet, fouling: &FoulingStatus, steps: usize, threshold: f64, seed: u64) -> PredictionResult {
    let mut noise = RandNoise::seeded(seed);
    physics_engine::run_basic(params, fouling, steps, threshold, &mut noise)
}

fn assert_invariants(result: &PredictionResult, steps: usize) {
    assert_eq!(result.pressure_data.len(), steps, "one pressure per step");
    assert!(
        result.pressure_data.iter().all(|p| *p >= MIN_PRESSURE),
        "pressure fell below the floor: {:?}",
        result.pressure_data
    );

    for pair in result.backwash_points.windows(2) {
        let gap = pair[1].time_step as i64 - pair[0].time_step as i64;
        assert!(gap > COOLDOWN_STEPS, "backwashes {gap} steps apart");
    }
    for event in &result.backwash_points {
        assert!(event.time_step < steps);
        assert!(event.time_step as i64 > COOLDOWN_STEPS - 1, "first trigger before step 4");
    }

    assert!(
        (0.5..=1.0).contains(&result.efficiency),
        "efficiency {} out of bounds",
        result.efficiency
    );
    assert!(!result.recommendations.is_empty());
}

// ============================================================================
// Single-curve engine
// ============================================================================

#[test]
fn invariants_hold_across_seeds_and_statuses() {
    let statuses = [
        FoulingStatus::Clean,
        FoulingStatus::Mild,
        FoulingStatus::Moderate,
        FoulingStatus::Severe,
        FoulingStatus::Critical,
    ];
    for seed in 0..20 {
        for status in &statuses {
            let result = basic(&harsh_parameters(), status, 50, 5.0, seed);
            assert_invariants(&result, 50);
        }
    }
}

#[test]
fn harsh_feed_triggers_backwash() {
    let result = basic(&harsh_parameters(), &FoulingStatus::Critical, 20, 5.0, 1);
    assert!(result.backwash_count() >= 1);
    assert_eq!(result.backwash_points[0].time_step, 4);
    assert_eq!(result.backwash_points[0].reason, "pressure_threshold_exceeded");
}

#[test]
fn single_step_horizon_never_backwashes() {
    let result = basic(&harsh_parameters(), &FoulingStatus::Critical, 1, 1.0, 9);
    assert_eq!(result.pressure_data, vec![8.0]);
    assert!(result.backwash_points.is_empty());
    assert_eq!(result.fouling_rate, 0.0);
    assert_eq!(result.efficiency, 1.0);
}

#[test]
fn unknown_status_behaves_like_clean() {
    let params = ParameterSet::default();
    let clean = basic(&params, &FoulingStatus::Clean, 30, 7.0, 11);
    let unknown = basic(&params, &FoulingStatus::from_label("mystery"), 30, 7.0, 11);
    assert_eq!(clean.pressure_data, unknown.pressure_data);
    assert_eq!(clean.backwash_points, unknown.backwash_points);
}

#[test]
fn same_seed_same_result() {
    let params = ParameterSet {
        turbidity: 1.1,
        ..ParameterSet::default()
    };
    let a = basic(&params, &FoulingStatus::Moderate, 40, 6.0, 2024);
    let b = basic(&params, &FoulingStatus::Moderate, 40, 6.0, 2024);
    assert_eq!(a, b);
}

#[test]
fn confidence_reflects_engine_variant() {
    let result = basic(&ParameterSet::default(), &FoulingStatus::Clean, 10, 7.0, 0);
    assert_eq!(result.confidence_score, EngineVariant::SingleCurve.confidence_score());
}

#[test]
fn reported_values_are_rounded() {
    let result = basic(&harsh_parameters(), &FoulingStatus::Severe, 30, 6.0, 5);
    for p in &result.pressure_data {
        assert!(((p * 100.0).round() - p * 100.0).abs() < 1e-6, "{p} not rounded to 2 places");
    }
    for event in &result.backwash_points {
        assert!(((event.intensity * 10.0).round() - event.intensity * 10.0).abs() < 1e-6);
        assert!([140, 220, 360, 460].contains(&event.duration));
    }
}

// ============================================================================
// Curve-driven engine
// ============================================================================

#[test]
fn curve_driven_invariants_hold() {
    let curves = CurveSet {
        turbidity_curve: vec![0.2, 0.8, 1.5, 2.0, 1.0],
        ph_curve: vec![6.5, 7.0, 8.5],
        temperature_curve: vec![18.0, 22.0, 30.0, 34.0],
    };
    for seed in 0..20 {
        let mut noise = RandNoise::seeded(seed);
        let result = physics_engine::run_with_curves(
            &ParameterSet::default(),
            &curves,
            &FoulingStatus::Severe,
            50,
            &mut noise,
        );
        assert_invariants(&result, 50);
        assert_eq!(result.confidence_score, EngineVariant::CurveDriven.confidence_score());
    }
}

#[test]
fn short_curve_is_padded_with_base_value() {
    let base = ParameterSet::default();
    let padded = CurveSet {
        turbidity_curve: vec![base.turbidity],
        ..CurveSet::default()
    };

    let mut a = RandNoise::seeded(77);
    let mut b = RandNoise::seeded(77);
    let with_curve = physics_engine::run_with_curves(&base, &padded, &FoulingStatus::Mild, 25, &mut a);
    let without = physics_engine::run_with_curves(&base, &CurveSet::default(), &FoulingStatus::Mild, 25, &mut b);
    assert_eq!(with_curve, without);
}

#[test]
fn curve_driven_starts_from_first_turbidity_sample() {
    let curves = CurveSet {
        turbidity_curve: vec![1.5, 0.1],
        ..CurveSet::default()
    };
    let mut noise = RandNoise::seeded(3);
    let result =
        physics_engine::run_with_curves(&ParameterSet::default(), &curves, &FoulingStatus::Clean, 5, &mut noise);
    assert_eq!(result.pressure_data[0], 7.0);
}
