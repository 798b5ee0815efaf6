#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{any, get},
    Router,
};
use serde_json::{json, Value};

use session_scope::config::AppConfig;
use session_scope::handlers::{self, ProxyState};
use session_scope::ScopedClient;

pub const SESSION_ID: &str = "sess_1";

/// In-process stand-in for the classroom API
pub struct MockUpstream {
    pub port: u16,
    pub base_url: String,
}

impl MockUpstream {
    /// Bind a free port and serve the mock routes on the current runtime.
    /// The listener is bound before returning, so the upstream is ready at once.
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind mock upstream on {}", port))?;

        tokio::spawn(async move {
            let _ = axum::serve(listener, mock_routes()).await;
        });

        Ok(Self { port, base_url })
    }
}

/// Same routes at the root and under `/classroom` for prefixed base URLs
fn mock_routes() -> Router {
    api_routes().nest("/classroom", api_routes())
}

fn api_routes() -> Router {
    Router::new()
        .route("/api/sessions/:id", get(session_detail))
        .route("/api/presence", get(presence))
        .route("/api/offtask/summary", get(offtask_summary))
        .route("/api/timeline", get(timeline))
        .route("/api/students", get(students))
        .route("/api/echo", any(echo))
}

async fn session_detail(Path(id): Path<String>) -> Response {
    match id.as_str() {
        SESSION_ID => Json(json!({
            "session": {
                "name": "Period 3",
                "students": [{ "id": "s1", "name": "Ada" }, "s2"],
                "controls": { "locked": false },
                "schedule": null
            },
            "active": true
        }))
        .into_response(),
        "sess_broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "sess_malformed" => Json(json!({ "active": true })).into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "error": "no such session" }))).into_response(),
    }
}

async fn presence() -> Json<Value> {
    Json(json!({
        "online": [
            { "id": "s1", "status": "active" },
            { "student": "s2", "status": "idle" },
            { "id": "s3", "status": "active" }
        ],
        "total": 3
    }))
}

/// Keyed by student, the way the classroom API stores presence
async fn offtask_summary() -> Json<Value> {
    Json(json!({
        "s1": { "last_seen": 1700000000, "flagged": false },
        "s3": { "last_seen": 1700000042, "flagged": true }
    }))
}

async fn timeline() -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain")],
        "timeline unavailable",
    )
        .into_response()
}

async fn students() -> Json<Value> {
    Json(json!([{ "id": "s1" }, { "id": "s3" }]))
}

/// Reflects the session header and the body as received
async fn echo(headers: HeaderMap, body: Bytes) -> Json<Value> {
    let session_headers: Vec<String> = headers
        .get_all("x-session-id")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect();
    let body = serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null);
    Json(json!({ "session_headers": session_headers, "body": body }))
}

/// Development config pointed at `base_url` and scoped to `session_id`
pub fn scoped_config(base_url: &str, session_id: &str) -> AppConfig {
    let mut config = AppConfig::development();
    config.upstream.base_url = base_url.to_string();
    config.upstream.timeout_secs = Some(5);
    config.session.session_id = session_id.to_string();
    config
}

pub fn scoped_client(base_url: &str, session_id: &str) -> Result<Arc<ScopedClient>> {
    Ok(Arc::new(ScopedClient::from_config(&scoped_config(base_url, session_id))?))
}

/// Proxy router over a client, with the roster already loaded when the
/// upstream knows the session
pub async fn proxy_router(base_url: &str, session_id: &str) -> Result<Router> {
    let client = scoped_client(base_url, session_id)?;
    client.refresh_or_keep().await;
    Ok(handlers::router(ProxyState::new(client, 1024 * 1024)))
}

/// Base URL nothing is listening on
pub fn dead_upstream() -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    Ok(format!("http://127.0.0.1:{}", port))
}

pub fn ids(entries: &Value) -> Vec<String> {
    entries
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(|e| e.get("id").or_else(|| e.get("student")))
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
