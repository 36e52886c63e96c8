//! Prediction endpoints: basic and curve-driven

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::api::envelope::ApiErrorResponse;
use crate::config::ServiceConfig;
use crate::physics_engine;
use crate::state::HistoryRecord;
use crate::types::{CurveSet, EngineVariant, FoulingStatus, ParameterSet, PredictionResult};
use crate::validation::{self, ValidationError};

use super::ApiState;

// ============================================================================
// Request / Response Types
// ============================================================================

/// Body of `POST /api/predict`. Values stay untyped until validation so
/// errors can name the field and the value that was sent.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub parameters: Map<String, Value>,
    pub fouling_status: String,
    #[serde(default)]
    pub time_steps: Option<Value>,
    #[serde(default)]
    pub pressure_threshold: Option<Value>,
}

/// Body of `POST /api/predict/advanced`.
#[derive(Debug, Deserialize)]
pub struct AdvancedPredictRequest {
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub curve_data: Option<Map<String, Value>>,
    #[serde(default)]
    pub fouling_status: Option<String>,
    #[serde(default)]
    pub time_steps: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct PredictionMetadata {
    pub model_version: String,
    pub prediction_timestamp: DateTime<Utc>,
    pub confidence_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uses_curve_data: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub success: bool,
    pub prediction_data: PredictionResult,
    pub metadata: PredictionMetadata,
}

// ============================================================================
// Validated Inputs
// ============================================================================

/// Validated basic prediction request.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicInput {
    pub parameters: ParameterSet,
    pub fouling: FoulingStatus,
    pub time_steps: usize,
    pub pressure_threshold: f64,
}

/// Validated curve-driven prediction request.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvancedInput {
    pub parameters: ParameterSet,
    pub curves: CurveSet,
    pub fouling: FoulingStatus,
    pub time_steps: usize,
    pub uses_curve_data: bool,
}

impl BasicInput {
    pub fn from_request(req: &PredictRequest, config: &ServiceConfig) -> Result<Self, ValidationError> {
        let parameters = validation::parse_parameters(&req.parameters)?;
        let fouling = resolve_fouling(&req.fouling_status, config)?;
        let time_steps = resolve_time_steps(req.time_steps.as_ref(), config)?;
        let pressure_threshold = req
            .pressure_threshold
            .as_ref()
            .map(validation::parse_pressure_threshold)
            .transpose()?
            .unwrap_or(config.model.default_pressure_threshold);

        Ok(Self {
            parameters,
            fouling,
            time_steps,
            pressure_threshold,
        })
    }
}

impl AdvancedInput {
    pub fn from_request(req: &AdvancedPredictRequest, config: &ServiceConfig) -> Result<Self, ValidationError> {
        let parameters = validation::parse_parameters(&req.parameters)?;
        let fouling = resolve_fouling(req.fouling_status.as_deref().unwrap_or("clean"), config)?;
        let time_steps = resolve_time_steps(req.time_steps.as_ref(), config)?;
        let curves = match &req.curve_data {
            Some(raw) => validation::parse_curves(raw)?,
            None => CurveSet::default(),
        };
        let uses_curve_data = req.curve_data.as_ref().is_some_and(|raw| !raw.is_empty());

        Ok(Self {
            parameters,
            curves,
            fouling,
            time_steps,
            uses_curve_data,
        })
    }
}

/// Unknown labels pass through as clean unless strict checking is on.
fn resolve_fouling(label: &str, config: &ServiceConfig) -> Result<FoulingStatus, ValidationError> {
    if config.validation.strict_fouling_status {
        return validation::validate_fouling_status(label);
    }
    let status = FoulingStatus::from_label(label);
    if !status.is_known() {
        warn!(fouling_status = %label, "Unknown fouling status, using clean factor");
    }
    Ok(status)
}

fn resolve_time_steps(raw: Option<&Value>, config: &ServiceConfig) -> Result<usize, ValidationError> {
    match raw {
        Some(value) => validation::parse_time_steps(value, config.model.max_time_steps),
        None => Ok(config.model.default_time_steps),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/predict - constant-parameter prediction
pub async fn predict(
    State(state): State<ApiState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return reject_body(&state, &rejection).await,
    };
    let input = match BasicInput::from_request(&req, &state.config) {
        Ok(input) => input,
        Err(e) => return reject(&state, &e).await,
    };

    let result = {
        let mut noise = state.noise_source();
        physics_engine::run_basic(
            &input.parameters,
            &input.fouling,
            input.time_steps,
            input.pressure_threshold,
            &mut noise,
        )
    };

    info!(
        fouling = %input.fouling,
        time_steps = input.time_steps,
        threshold = input.pressure_threshold,
        backwashes = result.backwash_count(),
        efficiency = result.efficiency,
        "Basic prediction served"
    );

    respond(&state, EngineVariant::SingleCurve, input.parameters, input.fouling, result, None).await
}

/// POST /api/predict/advanced - curve-driven prediction
pub async fn predict_advanced(
    State(state): State<ApiState>,
    payload: Result<Json<AdvancedPredictRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return reject_body(&state, &rejection).await,
    };
    let input = match AdvancedInput::from_request(&req, &state.config) {
        Ok(input) => input,
        Err(e) => return reject(&state, &e).await,
    };

    let result = {
        let mut noise = state.noise_source();
        physics_engine::run_with_curves(
            &input.parameters,
            &input.curves,
            &input.fouling,
            input.time_steps,
            &mut noise,
        )
    };

    info!(
        fouling = %input.fouling,
        time_steps = input.time_steps,
        uses_curve_data = input.uses_curve_data,
        backwashes = result.backwash_count(),
        efficiency = result.efficiency,
        "Curve-driven prediction served"
    );

    respond(
        &state,
        EngineVariant::CurveDriven,
        input.parameters,
        input.fouling,
        result,
        Some(input.uses_curve_data),
    )
    .await
}

async fn respond(
    state: &ApiState,
    variant: EngineVariant,
    parameters: ParameterSet,
    fouling: FoulingStatus,
    result: PredictionResult,
    uses_curve_data: Option<bool>,
) -> Response {
    let record = HistoryRecord::new(variant, parameters, fouling, &result);
    state.app_state.write().await.record_prediction(record);

    let body = PredictionResponse {
        success: true,
        metadata: PredictionMetadata {
            model_version: state.config.model.version.clone(),
            prediction_timestamp: Utc::now(),
            confidence_score: result.confidence_score,
            uses_curve_data,
        },
        prediction_data: result,
    };
    Json(body).into_response()
}

async fn reject(state: &ApiState, err: &ValidationError) -> Response {
    warn!(error = %err, "Prediction request rejected");
    state.app_state.write().await.record_validation_failure();
    ApiErrorResponse::validation(err)
}

async fn reject_body(state: &ApiState, rejection: &JsonRejection) -> Response {
    warn!(error = %rejection.body_text(), "Malformed prediction request");
    state.app_state.write().await.record_validation_failure();
    ApiErrorResponse::rejected(rejection)
}
