//! Application State
//!
//! Shared in-memory state for the prediction service: request counters and a
//! bounded log of recent prediction summaries. Nothing here is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Instant;
use uuid::Uuid;

use crate::types::{BackwashEvent, EngineVariant, FoulingStatus, ParameterSet, PredictionResult};

// ============================================================================
// History Record
// ============================================================================

/// Summary of one served prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub variant: EngineVariant,
    /// Request parameters (the base set for curve-driven runs)
    pub parameters: ParameterSet,
    pub fouling_status: FoulingStatus,
    pub time_steps: usize,
    pub backwash_points: Vec<BackwashEvent>,
    pub fouling_rate: f64,
    pub efficiency: f64,
    pub confidence_score: f64,
}

impl HistoryRecord {
    pub fn new(
        variant: EngineVariant,
        parameters: ParameterSet,
        fouling_status: FoulingStatus,
        result: &PredictionResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            variant,
            parameters,
            fouling_status,
            time_steps: result.pressure_data.len(),
            backwash_points: result.backwash_points.clone(),
            fouling_rate: result.fouling_rate,
            efficiency: result.efficiency,
            confidence_score: result.confidence_score,
        }
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Shared service state.
///
/// Wrapped in `Arc<RwLock<>>` by the API layer.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Process start, for uptime reporting
    pub uptime: Instant,

    /// Basic predictions served
    pub predictions_total: u64,

    /// Curve-driven predictions served
    pub advanced_predictions_total: u64,

    /// Requests rejected by validation
    pub validation_failures_total: u64,

    /// Backwash events across all served predictions
    pub backwash_events_total: u64,

    /// Recent predictions, oldest first
    history: VecDeque<HistoryRecord>,

    history_capacity: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(crate::config::defaults::HISTORY_CAPACITY)
    }
}

impl AppState {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            uptime: Instant::now(),
            predictions_total: 0,
            advanced_predictions_total: 0,
            validation_failures_total: 0,
            backwash_events_total: 0,
            history: VecDeque::with_capacity(history_capacity),
            history_capacity,
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.uptime.elapsed().as_secs()
    }

    /// Count a served prediction and log its summary, evicting the oldest
    /// record once the log is full.
    pub fn record_prediction(&mut self, record: HistoryRecord) {
        match record.variant {
            EngineVariant::SingleCurve => self.predictions_total += 1,
            EngineVariant::CurveDriven => self.advanced_predictions_total += 1,
        }
        self.backwash_events_total += record.backwash_points.len() as u64;

        if self.history_capacity == 0 {
            return;
        }
        while self.history.len() >= self.history_capacity {
            self.history.pop_front();
        }
        self.history.push_back(record);
    }

    pub fn record_validation_failure(&mut self) {
        self.validation_failures_total += 1;
    }

    /// Up to `limit` records, newest first.
    pub fn recent_history(&self, limit: usize) -> Vec<HistoryRecord> {
        self.history.iter().rev().take(limit).cloned().collect()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}
