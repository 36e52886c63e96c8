//! Service-wide default constants.
//!
//! Grouped by subsystem. Engine constants live next to the engine in
//! `physics_engine`; these only cover the service around it.

// ============================================================================
// Config Discovery
// ============================================================================

/// Env var naming a TOML config file.
pub const CONFIG_PATH_ENV: &str = "UF_BACKWASH_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "uf_backwash.toml";

// ============================================================================
// Server
// ============================================================================

pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8000";

/// Env var overriding `[server] addr`.
pub const SERVER_ADDR_ENV: &str = "UF_SERVER_ADDR";

/// Env var overriding `[cors] allowed_origins` (comma-separated).
pub const CORS_ORIGINS_ENV: &str = "UF_CORS_ORIGINS";

/// Largest accepted request body (bytes). Fifty-step curves are a few KB.
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Service name reported by `GET /`.
pub const SERVICE_NAME: &str = "Intelligent UF Backwash API";

// ============================================================================
// Model
// ============================================================================

pub const MODEL_VERSION: &str = "1.0.0";

/// Horizon used when a request omits `time_steps`.
pub const DEFAULT_TIME_STEPS: usize = 20;

/// Threshold (PSIG) used when a basic request omits `pressure_threshold`.
pub const DEFAULT_PRESSURE_THRESHOLD: f64 = 7.0;

// ============================================================================
// History
// ============================================================================

/// Prediction summaries kept in memory.
pub const HISTORY_CAPACITY: usize = 100;

/// `limit` applied by `GET /api/history` when none is given.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;
