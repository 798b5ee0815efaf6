// handlers/mod.rs - Scoping proxy routes
//
// The proxy owns three small endpoints of its own (/health, /scope/badge,
// /scope/refresh); every other method and path falls through to `proxy::forward`,
// which sends the call upstream through the interceptor pipeline.

pub mod proxy;
pub mod scope;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::client::ScopedClient;

/// Shared state for all proxy handlers
#[derive(Clone)]
pub struct ProxyState {
    pub client: Arc<ScopedClient>,
    pub max_request_size_bytes: usize,
}

impl ProxyState {
    pub fn new(client: Arc<ScopedClient>, max_request_size_bytes: usize) -> Self {
        Self {
            client,
            max_request_size_bytes,
        }
    }
}

pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/health", get(scope::health))
        .route("/scope/badge", get(scope::badge))
        .route("/scope/refresh", post(scope::refresh))
        .fallback(proxy::forward)
        .with_state(state)
}
