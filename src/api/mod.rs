//! REST API module using Axum
//!
//! Exposes the backwash prediction engine over HTTP. Successful prediction
//! bodies carry `{success, prediction_data, metadata}`; failures use the
//! error envelope in [`envelope`].

pub mod envelope;
pub mod handlers;
mod routes;

pub use handlers::ApiState;

use axum::http::{header, HeaderValue, Method, Uri};
use axum::response::Response;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::defaults::{CORS_ORIGINS_ENV, MAX_REQUEST_BODY_BYTES};
use envelope::ApiErrorResponse;

async fn not_found(uri: Uri) -> Response {
    ApiErrorResponse::not_found(format!("No route for {}", uri.path()))
}

/// Origins the CORS layer should allow.
///
/// `UF_CORS_ORIGINS` (comma-separated) wins over `cors.allowed_origins`.
/// Blank entries are ignored; an empty result means any origin.
fn resolve_cors_origins(env_value: Option<String>, configured: &[String]) -> Vec<String> {
    let raw: Vec<String> = match env_value {
        Some(raw) => raw.split(',').map(str::to_string).collect(),
        None => configured.to_vec(),
    };
    raw.iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

fn build_cors_layer(configured: &[String]) -> CorsLayer {
    let origins = resolve_cors_origins(std::env::var(CORS_ORIGINS_ENV).ok(), configured);

    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    tracing::info!(origins = ?origins, "CORS: allowing configured origins");
    base.allow_origin(allowed)
}

/// Create the complete application router.
pub fn create_app(state: ApiState) -> Router {
    let cors = build_cors_layer(&state.config.cors.allowed_origins);

    Router::new()
        .nest("/api", routes::api_routes(state.clone()))
        .merge(routes::root_routes(state))
        .fallback(not_found)
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_env_origins_fall_back_to_any() {
        assert!(resolve_cors_origins(Some(String::new()), &[]).is_empty());
        assert!(resolve_cors_origins(Some(" , ".to_string()), &[]).is_empty());
    }

    #[test]
    fn test_env_origins_override_config() {
        let configured = vec!["http://config.local".to_string()];
        assert_eq!(
            resolve_cors_origins(Some("http://a.local, ,http://b.local".to_string()), &configured),
            vec!["http://a.local", "http://b.local"]
        );
    }

    #[test]
    fn test_configured_origins_used_without_env() {
        let configured = vec!["http://plant.local".to_string(), "  ".to_string()];
        assert_eq!(resolve_cors_origins(None, &configured), vec!["http://plant.local"]);
    }
}
