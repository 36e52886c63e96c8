//! Per-step pressure drift
//!
//! ```text
//! trend = (0.3 + turbidity * 0.2)
//!       * fouling_factor
//!       * temperature / 25
//!       * (|pH - 7| * 0.1 + 1)
//! ```
//!
//! The single-curve engine additionally scales the trend once by a flow
//! factor; the curve-driven engine never does. The two behaviours are kept
//! as separate [`TrendMode`]s.

use crate::types::{FoulingStatus, ParameterSet};

/// How the trend evolves over a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendMode {
    /// Computed once at start including the flow factor, then only changed
    /// by backwash damping.
    HeldWithFlowFactor,
    /// Recomputed from the step's parameters every step, no flow factor.
    PerStepWithoutFlow,
}

/// Base pressure drift for the given parameters and fouling status.
pub fn compute_trend(parameters: &ParameterSet, fouling: &FoulingStatus) -> f64 {
    let base = 0.3 + parameters.turbidity * 0.2;
    base * fouling.factor() * parameters.temperature_factor() * parameters.ph_factor()
}

/// Flow-rate multiplier, 1.0 at the 20 GPM reference.
pub fn flow_factor(flow_rate: f64) -> f64 {
    (flow_rate / 20.0) * 0.2 + 0.8
}

/// Trend at the start of a run for the given mode.
pub fn initial_trend(mode: TrendMode, parameters: &ParameterSet, fouling: &FoulingStatus) -> f64 {
    match mode {
        TrendMode::HeldWithFlowFactor => {
            compute_trend(parameters, fouling) * flow_factor(parameters.flow_rate)
        }
        TrendMode::PerStepWithoutFlow => compute_trend(parameters, fouling),
    }
}

/// Starting transmembrane pressure for a given turbidity.
pub fn initial_pressure(turbidity: f64) -> f64 {
    4.0 + turbidity * 2.0
}
