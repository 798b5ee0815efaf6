use axum::extract::State;
use serde_json::{json, Value};

use crate::handlers::ProxyState;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /scope/badge - session name and roster size for the console header
pub async fn badge(State(state): State<ProxyState>) -> ApiResult<Value> {
    Ok(ApiResponse::success(state.client.session().badge()))
}

/// POST /scope/refresh - reload the roster from the session endpoint
pub async fn refresh(State(state): State<ProxyState>) -> ApiResult<Value> {
    let snapshot = state.client.refresh_session().await?;
    Ok(ApiResponse::success(snapshot.badge()))
}

/// GET /health
pub async fn health(State(state): State<ProxyState>) -> ApiResult<Value> {
    let snapshot = state.client.session();
    Ok(ApiResponse::success(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "session_id": snapshot.session_id,
        "members": snapshot.members.len(),
        "failure_policy": state.client.pipeline().policy(),
        "stages": state.client.pipeline().stage_names(),
    })))
}
