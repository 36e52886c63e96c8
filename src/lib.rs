//! UF Backwash: membrane pressure prediction
//!
//! Simulates transmembrane pressure for an ultrafiltration membrane over a
//! discrete horizon, schedules backwash cycles when pressure crosses a
//! threshold, and scores the run.
//!
//! ## Layout
//!
//! - **types**: water-quality parameters, fouling status, prediction results
//! - **physics_engine**: pressure trend, backwash policy, simulators, metrics
//! - **validation**: request bounds and error reporting
//! - **config**: TOML service configuration
//! - **state**: counters and in-memory prediction log
//! - **api**: Axum HTTP surface

pub mod api;
pub mod config;
pub mod physics_engine;
pub mod state;
pub mod types;
pub mod validation;

pub use config::ServiceConfig;
pub use physics_engine::{run_basic, run_with_curves, NoiseSource, RandNoise};
pub use types::{BackwashEvent, CurveSet, EngineVariant, FoulingStatus, ParameterSet, PredictionResult};
pub use validation::ValidationError;
