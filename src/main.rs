use std::sync::Arc;

use session_scope::config;
use session_scope::handlers::{self, ProxyState};
use session_scope::ScopedClient;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SCOPE_UPSTREAM_URL, SCOPE_SESSION_ID, etc.
    let _ = dotenvy::dotenv();

    let default_filter = if session_scope::is_development!() {
        "session_scope=debug,tower_http=debug"
    } else if config::config().filter.debug_logging {
        "session_scope=debug"
    } else {
        "session_scope=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let config = config::config();
    tracing::info!(
        "Starting session scope proxy in {:?} mode (upstream {}, policy {:?})",
        config.environment, config.upstream.base_url, config.filter.failure_policy
    );

    let client = Arc::new(ScopedClient::from_config(config)?);

    // Roster load happens once; until it lands every identified entity is filtered out
    let snapshot = client.refresh_or_keep().await;
    if snapshot.members.is_empty() {
        tracing::warn!("Session '{}' has no members loaded; watched responses will be empty", snapshot.session_id);
    }

    let state = ProxyState::new(client, config.proxy.max_request_size_bytes);
    let mut app = handlers::router(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));
    if config.proxy.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    let bind_addr = format!("0.0.0.0:{}", config.proxy.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Session scope proxy listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
