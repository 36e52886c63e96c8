//! Shared data structures for UF backwash prediction
//!
//! - `parameters`: ParameterSet (feed water quality) and CurveSet (per-step curves)
//! - `fouling`: FoulingStatus classification and its trend factor
//! - `prediction`: BackwashEvent, PredictionResult, EngineVariant

mod fouling;
mod parameters;
mod prediction;

pub use fouling::*;
pub use parameters::*;
pub use prediction::*;
