//! Observability: Prometheus metrics

use axum::extract::State;
use axum::response::IntoResponse;

use super::ApiState;

/// GET /metrics
///
/// Runtime counters in Prometheus text format (version 0.0.4), hand-formatted
/// from `AppState`.
///
/// Exposed metrics:
/// - `uf_predictions_total` - basic predictions served
/// - `uf_advanced_predictions_total` - curve-driven predictions served
/// - `uf_validation_failures_total` - requests rejected by validation
/// - `uf_backwash_events_total` - backwash events across served predictions
/// - `uf_history_records` - records currently held in the prediction log
/// - `uf_uptime_seconds` - process uptime
pub async fn get_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let app_state = state.app_state.read().await;

    let mut body = String::with_capacity(1024);

    body.push_str("# HELP uf_predictions_total Basic predictions served\n");
    body.push_str("# TYPE uf_predictions_total counter\n");
    body.push_str(&format!("uf_predictions_total {}\n", app_state.predictions_total));

    body.push_str("# HELP uf_advanced_predictions_total Curve-driven predictions served\n");
    body.push_str("# TYPE uf_advanced_predictions_total counter\n");
    body.push_str(&format!(
        "uf_advanced_predictions_total {}\n",
        app_state.advanced_predictions_total
    ));

    body.push_str("# HELP uf_validation_failures_total Requests rejected by validation\n");
    body.push_str("# TYPE uf_validation_failures_total counter\n");
    body.push_str(&format!(
        "uf_validation_failures_total {}\n",
        app_state.validation_failures_total
    ));

    body.push_str("# HELP uf_backwash_events_total Backwash events across served predictions\n");
    body.push_str("# TYPE uf_backwash_events_total counter\n");
    body.push_str(&format!("uf_backwash_events_total {}\n", app_state.backwash_events_total));

    body.push_str("# HELP uf_history_records Records held in the prediction log\n");
    body.push_str("# TYPE uf_history_records gauge\n");
    body.push_str(&format!("uf_history_records {}\n", app_state.history_len()));

    body.push_str("# HELP uf_uptime_seconds Process uptime in seconds\n");
    body.push_str("# TYPE uf_uptime_seconds gauge\n");
    body.push_str(&format!("uf_uptime_seconds {}\n", app_state.uptime_secs()));

    (
        axum::http::StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}
