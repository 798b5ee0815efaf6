use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::transport::TransportError;

/// Interception errors with structured error types
#[derive(Debug, Error)]
pub enum InterceptError {
    #[error("Stage '{stage}' failed: {message}")]
    StageFailed { stage: &'static str, message: String },

    #[error("Invalid header value for '{header}': {reason}")]
    InvalidHeader { header: String, reason: String },

    #[error("Invalid watch pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl InterceptError {
    pub fn stage(stage: &'static str, message: impl Into<String>) -> Self {
        InterceptError::StageFailed {
            stage,
            message: message.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, InterceptError::Transport(_))
    }
}

/// What the pipeline does when one of its own stages fails.
/// Transport failures are not covered: they always reach the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Deliver the unmodified request/response instead
    #[default]
    Open,
    /// Surface the stage error to the caller
    Closed,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" | "fail-open" => Ok(FailurePolicy::Open),
            "closed" | "fail-closed" => Ok(FailurePolicy::Closed),
            other => Err(format!("unknown failure policy '{}'", other)),
        }
    }
}
