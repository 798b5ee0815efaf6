use serde_json::Value;

use crate::cli::utils::output_document;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::transport::ScopedRequest;
use crate::ScopedClient;

pub async fn handle(
    config: &AppConfig,
    path: String,
    session: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(id) = session {
        config.session.session_id = id;
    }

    let client = ScopedClient::from_config(&config)?;
    let snapshot = client.refresh_or_keep().await;
    tracing::debug!("Scoping GET {} to {} member(s)", path, snapshot.members.len());

    let response = client.send(ScopedRequest::get(path)).await?;
    if !response.is_success() {
        eprintln!("HTTP {} {}", response.status.as_u16(), response.status_text());
    }

    match serde_json::from_slice::<Value>(&response.body) {
        Ok(document) => output_document(&output_format, &document)?,
        Err(_) => println!("{}", String::from_utf8_lossy(&response.body)),
    }
    Ok(())
}
