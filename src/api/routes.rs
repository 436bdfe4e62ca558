//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    group_empty_key_handler, group_get_handler, health_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET {base_path}:group/*key` - Cached bytes for a key, loaded on a miss
/// - `GET {base_path}:group/` - Empty key, answered with 400
/// - `GET /stats/:group` - Cache statistics of a group
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let group_route = format!("{}:group/*key", state.base_path);
    let empty_key_route = format!("{}:group/", state.base_path);

    Router::new()
        .route(&group_route, get(group_get_handler))
        .route(&empty_key_route, get(group_empty_key_handler))
        .route("/stats/:group", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
