//! Service banner, model description and health

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::defaults::SERVICE_NAME;
use crate::types::FoulingStatus;
use crate::validation::PARAMETER_RANGES;

use super::ApiState;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: String,
}

/// GET / - Service banner
pub async fn root(State(state): State<ApiState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: SERVICE_NAME,
        version: state.config.model.version.clone(),
    })
}

#[derive(Debug, Serialize)]
pub struct ParameterInfo {
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub model_version: String,
    /// Keyed by parameter name
    pub supported_parameters: serde_json::Map<String, serde_json::Value>,
    pub fouling_statuses: [&'static str; 5],
    pub pressure_threshold: f64,
    pub max_time_steps: usize,
}

/// GET /api/model/info - Supported parameters and limits
pub async fn model_info(State(state): State<ApiState>) -> Json<ModelInfoResponse> {
    let supported_parameters = PARAMETER_RANGES
        .iter()
        .map(|r| {
            let info = ParameterInfo {
                min: r.min,
                max: r.max,
                unit: r.unit,
            };
            (r.name.to_string(), serde_json::json!(info))
        })
        .collect();

    Json(ModelInfoResponse {
        model_version: state.config.model.version.clone(),
        supported_parameters,
        fouling_statuses: FoulingStatus::KNOWN_LABELS,
        pressure_threshold: state.config.model.default_pressure_threshold,
        max_time_steps: state.config.model.max_time_steps,
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub model_status: &'static str,
    pub uptime_seconds: u64,
}

/// GET /api/health - Liveness check
pub async fn health_check(State(state): State<ApiState>) -> Json<HealthResponse> {
    let app_state = state.app_state.read().await;
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        model_status: "ready",
        uptime_seconds: app_state.uptime_secs(),
    })
}
