use crate::cli::utils::{output_document, sorted_members};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::ScopedClient;

pub async fn handle(config: &AppConfig, id: String, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut config = config.clone();
    config.session.session_id = id;

    let client = ScopedClient::from_config(&config)?;
    let snapshot = client.refresh_session().await?;

    match output_format {
        OutputFormat::Json => output_document(&output_format, &serde_json::to_value(snapshot.as_ref())?)?,
        OutputFormat::Text => {
            match &snapshot.name {
                Some(name) => println!("Session: {} ({})", snapshot.session_id, name),
                None => println!("Session: {}", snapshot.session_id),
            }
            println!("Active: {}", if snapshot.active { "yes" } else { "no" });
            println!("Members ({}):", snapshot.members.len());
            for member in sorted_members(&snapshot.members) {
                println!("  {}", member);
            }
        }
    }
    Ok(())
}
