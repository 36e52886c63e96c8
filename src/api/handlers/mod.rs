//! API route handlers
//!
//! - `predict`: basic and curve-driven predictions
//! - `model`: service banner, model info and health
//! - `history`: recent in-memory prediction summaries
//! - `metrics`: Prometheus counters

mod history;
mod metrics;
mod model;
mod predict;

pub use history::*;
pub use metrics::*;
pub use model::*;
pub use predict::*;

use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::ServiceConfig;
use crate::physics_engine::RandNoise;
use crate::state::AppState;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Counters and prediction log
    pub app_state: Arc<RwLock<AppState>>,
    /// Immutable service configuration
    pub config: Arc<ServiceConfig>,
}

impl ApiState {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            app_state: Arc::new(RwLock::new(AppState::new(config.history.capacity))),
            config: Arc::new(config),
        }
    }

    /// Fresh random source for one prediction, seeded when the config asks for it.
    pub fn noise_source(&self) -> RandNoise<StdRng> {
        match self.config.simulation.seed {
            Some(seed) => RandNoise::seeded(seed),
            None => RandNoise::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics_engine::NoiseSource;

    #[test]
    fn test_new_uses_history_capacity() {
        let mut config = ServiceConfig::default();
        config.history.capacity = 7;
        let state = ApiState::new(config);
        assert_eq!(state.config.history.capacity, 7);
    }

    #[test]
    fn test_seeded_noise_repeats_per_request() {
        let mut config = ServiceConfig::default();
        config.simulation.seed = Some(3);
        let state = ApiState::new(config);
        let a = state.noise_source().uniform(-0.1, 0.1);
        let b = state.noise_source().uniform(-0.1, 0.1);
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
