//! Recent prediction log

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::defaults::DEFAULT_HISTORY_LIMIT;
use crate::state::HistoryRecord;

use super::ApiState;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// Only records at or after this instant
    pub start_date: Option<DateTime<Utc>>,
    /// Only records at or before this instant
    pub end_date: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub history: Vec<HistoryRecord>,
    /// Records matching the date filter, before `limit` is applied
    pub total_count: usize,
}

/// GET /api/history - Recent prediction summaries, newest first
pub async fn get_history(
    State(state): State<ApiState>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    let app_state = state.app_state.read().await;

    let matching: Vec<HistoryRecord> = app_state
        .recent_history(usize::MAX)
        .into_iter()
        .filter(|r| query.start_date.map_or(true, |start| r.timestamp >= start))
        .filter(|r| query.end_date.map_or(true, |end| r.timestamp <= end))
        .collect();

    let total_count = matching.len();
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);

    Json(HistoryResponse {
        success: true,
        history: matching.into_iter().take(limit).collect(),
        total_count,
    })
}
