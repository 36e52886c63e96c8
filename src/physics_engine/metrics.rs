//! Post-run diagnostics derived from a finished trajectory

use statrs::statistics::Statistics;

use crate::types::{BackwashEvent, FoulingStatus, ParameterSet};

/// Efficiency never drops below this, even after frequency penalties.
pub const MIN_EFFICIENCY: f64 = 0.5;

/// Horizon the frequency advice assumes, whatever the real run length was.
pub const ASSUMED_HORIZON_STEPS: f64 = 20.0;

pub const REC_ADJUST_PH: &str = "Consider adjusting pH closer to neutral (7.0) for optimal performance";
pub const REC_HIGH_TEMPERATURE: &str = "High temperature detected - monitor fouling rate closely";
pub const REC_LOW_TEMPERATURE: &str = "Low temperature may reduce system efficiency";
pub const REC_HIGH_TURBIDITY: &str = "High turbidity detected - consider pre-treatment";
pub const REC_CHEMICAL_CLEANING: &str = "Severe fouling detected - consider chemical cleaning";
pub const REC_LOW_EFFICIENCY: &str = "System efficiency is low - review operational parameters";
pub const REC_FREQUENT_BACKWASH: &str = "Backwash frequency is high - consider optimizing parameters";
pub const REC_INFREQUENT_BACKWASH: &str = "Backwash frequency is low - monitor pressure closely";
pub const REC_OPTIMAL: &str = "System operating within optimal parameters";

/// Mean of the strictly positive step-to-step pressure increases.
///
/// Backwash drops are negative and never count. Returns 0.0 for fewer than
/// two samples or a trajectory that never rises.
pub fn fouling_rate(pressure_data: &[f64]) -> f64 {
    let (sum, count) = pressure_data
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|delta| *delta > 0.0)
        .fold((0.0, 0usize), |(sum, count), delta| (sum + delta, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Operating efficiency in `[MIN_EFFICIENCY, 1.0]`.
///
/// Starts from pressure stability (population variance) and is penalised
/// when the run-length / backwash-count interval is too short or too long.
/// An empty trajectory scores 0.0.
pub fn efficiency(pressure_data: &[f64], backwash_points: &[BackwashEvent]) -> f64 {
    if pressure_data.is_empty() {
        return 0.0;
    }

    let variance = pressure_data.iter().population_variance();
    let mut eff = (1.0 - variance / 10.0).max(MIN_EFFICIENCY);

    if !backwash_points.is_empty() {
        let avg_interval = pressure_data.len() as f64 / backwash_points.len() as f64;
        if avg_interval < 5.0 {
            eff *= 0.9;
        } else if avg_interval > 15.0 {
            eff *= 0.95;
        }
    }

    eff.clamp(MIN_EFFICIENCY, 1.0)
}

/// Rule-based advice from the final parameters, fouling status, efficiency
/// and backwash count. Never empty.
pub fn generate_recommendations(
    parameters: &ParameterSet,
    fouling: &FoulingStatus,
    backwash_count: usize,
    efficiency: f64,
) -> Vec<String> {
    let mut recs = Vec::new();

    if (parameters.ph - 7.0).abs() > 1.0 {
        recs.push(REC_ADJUST_PH);
    }

    if parameters.temperature > 30.0 {
        recs.push(REC_HIGH_TEMPERATURE);
    } else if parameters.temperature < 20.0 {
        recs.push(REC_LOW_TEMPERATURE);
    }

    if parameters.turbidity > 1.0 {
        recs.push(REC_HIGH_TURBIDITY);
    }

    if fouling.needs_chemical_cleaning() {
        recs.push(REC_CHEMICAL_CLEANING);
    }

    if efficiency < 0.7 {
        recs.push(REC_LOW_EFFICIENCY);
    }

    if backwash_count > 0 {
        let avg_interval = ASSUMED_HORIZON_STEPS / backwash_count as f64;
        if avg_interval < 5.0 {
            recs.push(REC_FREQUENT_BACKWASH);
        } else if avg_interval > 15.0 {
            recs.push(REC_INFREQUENT_BACKWASH);
        }
    }

    if recs.is_empty() {
        recs.push(REC_OPTIMAL);
    }

    recs.into_iter().map(str::to_string).collect()
}
