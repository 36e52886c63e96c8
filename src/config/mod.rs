//! Service Configuration Module
//!
//! TOML configuration for the prediction service.
//!
//! ## Loading Order
//!
//! 1. `UF_BACKWASH_CONFIG` environment variable (path to TOML file)
//! 2. `uf_backwash.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The loaded config is passed explicitly (as `Arc<ServiceConfig>`) to the
//! API layer; the engine itself never reads configuration.

mod service_config;
pub mod defaults;
pub mod validation;

pub use service_config::*;
