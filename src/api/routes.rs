use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{
    get_code, health, list_codes, not_found, openapi_json, send_result, AppState,
};
use super::middleware::logging_middleware;
use crate::metrics;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Operation codes
        .route("/codes", get(list_codes))
        .route("/codes/:code", get(get_code))
        .route("/results", post(send_result))
        // Metrics endpoint (Prometheus)
        .route("/metrics", get(metrics::metrics_handler))
        // OpenAPI documentation
        .route("/api-docs/openapi.json", get(openapi_json))
        .fallback(not_found)
        // Order matters: logging -> metrics -> trace
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics::middleware::track_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
