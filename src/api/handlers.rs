//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::config::{Config, DEFAULT_BASE_PATH};
use crate::error::{CacheError, Result};
use crate::group::GroupRegistry;
use crate::models::{HealthResponse, StatsResponse};
use crate::ring::{PeerRouter, DEFAULT_REPLICAS};

/// Header naming the peer that owns the requested key.
pub const OWNER_HEADER: HeaderName = HeaderName::from_static("x-cache-owner");

/// Application state shared across all handlers.
///
/// The registry and router are built once by `main` and only read here.
#[derive(Clone)]
pub struct AppState {
    /// Cache groups by name
    pub registry: Arc<GroupRegistry>,
    /// Key -> peer routing
    pub router: Arc<PeerRouter>,
    /// Path prefix for group lookups
    pub base_path: String,
}

impl AppState {
    /// Creates a new AppState with the given registry and router.
    pub fn new(registry: Arc<GroupRegistry>, router: Arc<PeerRouter>) -> Self {
        Self {
            registry,
            router,
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// The peer ring is filled from `config.peers`; groups still have to be
    /// registered on the returned registry.
    pub fn from_config(config: &Config, registry: Arc<GroupRegistry>) -> Self {
        let router = PeerRouter::new(config.self_addr.clone(), config.ring_replicas);
        if !config.peers.is_empty() {
            router.set_peers(&config.peers);
        }
        Self {
            registry,
            router: Arc::new(router),
            base_path: config.base_path.clone(),
        }
    }

    /// A state with an empty registry and no peers, for tests and tools.
    pub fn standalone(self_addr: &str) -> Self {
        Self::new(
            Arc::new(GroupRegistry::new()),
            Arc::new(PeerRouter::new(self_addr, DEFAULT_REPLICAS)),
        )
    }
}

/// Handler for GET {base_path}:group/*key
///
/// Serves the cached bytes for `key` in `group`, loading them on a miss.
pub async fn group_get_handler(
    State(state): State<AppState>,
    Path((group_name, key)): Path<(String, String)>,
) -> Result<Response> {
    serve_key(&state, &group_name, &key)
}

/// Handler for GET {base_path}:group/
///
/// The key wildcard never matches an empty tail, so a request with the key
/// left out lands here and is rejected like any other empty key.
pub async fn group_empty_key_handler(
    State(state): State<AppState>,
    Path(group_name): Path<String>,
) -> Result<Response> {
    serve_key(&state, &group_name, "")
}

fn serve_key(state: &AppState, group_name: &str, key: &str) -> Result<Response> {
    info!(
        server = state.router.self_addr(),
        group = group_name,
        key,
        "GET {}{}/{}",
        state.base_path,
        group_name,
        key
    );

    let group = state
        .registry
        .get(group_name)
        .ok_or_else(|| CacheError::GroupNotFound(group_name.to_string()))?;
    let view = group.get(key)?;

    let owner = state
        .router
        .owner(key)
        .unwrap_or_else(|| state.router.self_addr().to_string());
    let owner = HeaderValue::from_str(&owner)
        .map_err(|e| CacheError::Internal(format!("invalid owner header '{owner}': {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/octet-stream")),
            (OWNER_HEADER, owner),
        ],
        view.byte_slice(),
    )
        .into_response())
}

/// Handler for GET /stats/:group
///
/// Returns the cache statistics of one group.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(group_name): Path<String>,
) -> Result<Json<StatsResponse>> {
    let group = state
        .registry
        .get(&group_name)
        .ok_or_else(|| CacheError::GroupNotFound(group_name.clone()))?;

    Ok(Json(StatsResponse::new(
        group.name(),
        &group.stats(),
        group.max_bytes(),
    )))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{Group, GetterFn};
    use anyhow::anyhow;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    fn test_state() -> AppState {
        let state = AppState::standalone("http://localhost:9999");
        let group = Group::builder("scores")
            .max_bytes(2 << 10)
            .getter(GetterFn::new(|key: &str| match key {
                "Tom" => Ok(b"630".to_vec()),
                _ => Err(anyhow!("{key} not exist")),
            }))
            .build()
            .unwrap();
        state.registry.register(group).unwrap();
        state
    }

    fn path(group: &str, key: &str) -> Path<(String, String)> {
        Path((group.to_string(), key.to_string()))
    }

    #[tokio::test]
    async fn test_group_get_handler_returns_bytes() {
        let state = test_state();

        let response = group_get_handler(State(state), path("scores", "Tom"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );
        assert_eq!(response.headers()[OWNER_HEADER], "http://localhost:9999");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"630");
    }

    #[tokio::test]
    async fn test_group_get_handler_unknown_group() {
        let state = test_state();

        let result = group_get_handler(State(state), path("missing", "Tom")).await;
        assert!(matches!(result, Err(CacheError::GroupNotFound(_))));
    }

    #[tokio::test]
    async fn test_group_get_handler_loader_error() {
        let state = test_state();

        let result = group_get_handler(State(state), path("scores", "Nobody")).await;
        assert!(matches!(result, Err(CacheError::Load { .. })));
    }

    #[tokio::test]
    async fn test_group_get_handler_empty_key() {
        let state = test_state();

        let result = group_get_handler(State(state), path("scores", "")).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_group_empty_key_handler() {
        let result =
            group_empty_key_handler(State(test_state()), Path("scores".to_string())).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));

        let result =
            group_empty_key_handler(State(test_state()), Path("missing".to_string())).await;
        assert!(matches!(result, Err(CacheError::GroupNotFound(_))));
    }

    #[tokio::test]
    async fn test_owner_header_uses_ring() {
        let state = test_state();
        state.router.set_peers(["http://peer-a:8001"]);

        let response = group_get_handler(State(state), path("scores", "Tom"))
            .await
            .unwrap();
        assert_eq!(response.headers()[OWNER_HEADER], "http://peer-a:8001");
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();
        group_get_handler(State(state.clone()), path("scores", "Tom"))
            .await
            .unwrap();

        let response = stats_handler(State(state), Path("scores".to_string()))
            .await
            .unwrap();
        assert_eq!(response.group, "scores");
        assert_eq!(response.loads, 1);
        assert_eq!(response.total_entries, 1);
    }

    #[tokio::test]
    async fn test_stats_handler_unknown_group() {
        let state = test_state();
        let result = stats_handler(State(state), Path("missing".to_string())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
