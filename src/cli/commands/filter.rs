use anyhow::Context;
use serde_json::{json, Value};
use std::io::Read;

use crate::cli::utils::{output_document, output_success};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::filter::{MemberSet, PayloadFilter};
use crate::intercept::WatchedEndpoints;

pub fn handle(members: Vec<String>, file: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("failed to read {}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
            buf
        }
    };

    let document: Value = serde_json::from_str(&raw).context("input is not valid JSON")?;
    let members: MemberSet = members
        .into_iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();

    let filtered = PayloadFilter::new(&members).apply(&document);
    if let OutputFormat::Text = output_format {
        eprintln!("Removed {} non-member entr{}", filtered.removed, if filtered.removed == 1 { "y" } else { "ies" });
    }
    output_document(&output_format, &filtered.value)
}

pub fn watched(config: &AppConfig, path: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let watched = WatchedEndpoints::with_extra(&config.filter.extra_watched)?;
    let is_watched = watched.is_watched(path);

    let message = if is_watched {
        format!("{} is watched; GET responses are filtered", path)
    } else {
        format!("{} is not watched; responses pass through", path)
    };
    output_success(
        &output_format,
        &message,
        Some(json!({ "path": path, "watched": is_watched, "patterns": watched.patterns() })),
    )
}
