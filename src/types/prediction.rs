//! Engine outputs: backwash events and the prediction result

use serde::{Deserialize, Serialize};

/// Reason recorded on every triggered backwash.
pub const BACKWASH_REASON: &str = "pressure_threshold_exceeded";

/// A backwash triggered during a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackwashEvent {
    /// Step index at which the backwash fired
    pub time_step: usize,
    /// Transmembrane pressure at the trigger, before the drop is applied
    pub pressure: f64,
    /// Backwash intensity (W), rounded to 1 decimal
    pub intensity: f64,
    /// Backwash duration (seconds)
    pub duration: u32,
    /// Always [`BACKWASH_REASON`]
    pub reason: String,
}

/// Which entry point produced a result.
///
/// The two variants differ in how the pressure trend evolves;
/// see `physics_engine::trend::TrendMode`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EngineVariant {
    /// Constant parameters, flow factor applied once, backwash feeds back into the trend
    SingleCurve,
    /// Turbidity/pH/temperature resampled per step, trend recomputed every step
    CurveDriven,
}

impl EngineVariant {
    pub const fn confidence_score(self) -> f64 {
        match self {
            Self::SingleCurve => 0.9,
            Self::CurveDriven => 0.85,
        }
    }
}

impl std::fmt::Display for EngineVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SingleCurve => write!(f, "single-curve"),
            Self::CurveDriven => write!(f, "curve-driven"),
        }
    }
}

/// Full output of one simulation run. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Pressure at the start of each step (PSIG), rounded to 2 decimals
    pub pressure_data: Vec<f64>,
    /// Backwash events in trigger order
    pub backwash_points: Vec<BackwashEvent>,
    /// Mean positive pressure increase per step, rounded to 3 decimals
    pub fouling_rate: f64,
    /// Operating efficiency in [0.5, 1.0], rounded to 3 decimals
    pub efficiency: f64,
    /// Advisory messages, never empty
    pub recommendations: Vec<String>,
    pub confidence_score: f64,
}

impl PredictionResult {
    pub fn backwash_count(&self) -> usize {
        self.backwash_points.len()
    }

    /// Highest recorded pressure, or `None` for an empty trajectory.
    pub fn peak_pressure(&self) -> Option<f64> {
        self.pressure_data.iter().copied().reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_per_variant() {
        assert_eq!(EngineVariant::SingleCurve.confidence_score(), 0.9);
        assert_eq!(EngineVariant::CurveDriven.confidence_score(), 0.85);
    }

    #[test]
    fn test_event_serializes_expected_fields() {
        let event = BackwashEvent {
            time_step: 5,
            pressure: 7.12,
            intensity: 0.2,
            duration: 220,
            reason: BACKWASH_REASON.to_string(),
        };
        let v = serde_json::to_value(&event).unwrap();
        assert_eq!(v["time_step"], 5);
        assert_eq!(v["duration"], 220);
        assert_eq!(v["reason"], "pressure_threshold_exceeded");
    }

    #[test]
    fn test_peak_pressure() {
        let result = PredictionResult {
            pressure_data: vec![5.0, 6.4, 3.2],
            backwash_points: vec![],
            fouling_rate: 0.0,
            efficiency: 1.0,
            recommendations: vec![],
            confidence_score: 0.9,
        };
        assert_eq!(result.peak_pressure(), Some(6.4));
        assert_eq!(result.backwash_count(), 0);
    }
}
