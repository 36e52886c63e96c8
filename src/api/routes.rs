//! API route definitions
//!
//! - /api/model/info - supported parameters and limits
//! - /api/predict - constant-parameter prediction
//! - /api/predict/advanced - curve-driven prediction
//! - /api/history - recent predictions
//! - /api/health - liveness
//! - / and /metrics at the root

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, ApiState};

/// Routes nested under `/api`
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/model/info", get(handlers::model_info))
        .route("/predict", post(handlers::predict))
        .route("/predict/advanced", post(handlers::predict_advanced))
        .route("/history", get(handlers::get_history))
        .route("/health", get(handlers::health_check))
        .with_state(state)
}

/// Banner and Prometheus scrape endpoint
pub fn root_routes(state: ApiState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/metrics", get(handlers::get_metrics))
        .with_state(state)
}
