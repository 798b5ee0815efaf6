pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "scope")]
#[command(about = "Scope CLI - inspect sessions and issue session-scoped API calls")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Upstream API base URL (overrides SCOPE_UPSTREAM_URL)")]
    pub upstream: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Fetch a session and show its roster")]
    Session {
        #[arg(help = "Session id")]
        id: String,
    },

    #[command(about = "Issue a session-scoped GET through the interceptor pipeline")]
    Get {
        #[arg(help = "Request path, e.g. /api/presence")]
        path: String,
        #[arg(long, help = "Session id (defaults to SCOPE_SESSION_ID)")]
        session: Option<String>,
    },

    #[command(about = "Filter a JSON document against a roster offline")]
    Filter {
        #[arg(long, value_delimiter = ',', help = "Comma separated member identifiers")]
        members: Vec<String>,
        #[arg(long, help = "Input file (reads stdin when omitted)")]
        file: Option<String>,
    },

    #[command(about = "Check whether a path is subject to response filtering")]
    Watched {
        #[arg(help = "Request path")]
        path: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Effective configuration for a CLI run
pub fn resolve_config(upstream: Option<String>) -> crate::config::AppConfig {
    let mut config = crate::config::config().clone();
    if let Some(url) = upstream {
        config.upstream.base_url = url.trim_end_matches('/').to_string();
    }
    config
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = resolve_config(cli.upstream);

    match cli.command {
        Commands::Session { id } => commands::session::handle(&config, id, output_format).await,
        Commands::Get { path, session } => {
            commands::get::handle(&config, path, session, output_format).await
        }
        Commands::Filter { members, file } => commands::filter::handle(members, file, output_format),
        Commands::Watched { path } => commands::filter::watched(&config, &path, output_format),
    }
}
