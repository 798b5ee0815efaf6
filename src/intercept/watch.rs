use regex::RegexSet;

use crate::intercept::error::InterceptError;

/// Read endpoints whose responses are filtered by default:
/// presence, command queues, timeline, heartbeat and off-task reports.
pub const DEFAULT_WATCHED_PATTERNS: [&str; 5] = [
    r"^/api/presence/?$",
    r"^/api/commands(/|$)",
    r"^/api/timeline/?$",
    r"^/api/heartbeat/?$",
    r"^/api/offtask(/|$)",
];

/// Compiled watch-list. Any pattern matching the request path qualifies;
/// query strings are stripped before matching.
#[derive(Debug, Clone)]
pub struct WatchedEndpoints {
    patterns: Vec<String>,
    set: RegexSet,
}

impl WatchedEndpoints {
    pub fn new<I, S>(patterns: I) -> Result<Self, InterceptError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let set = RegexSet::new(&patterns).map_err(|e| InterceptError::InvalidPattern {
            pattern: patterns.join(", "),
            reason: e.to_string(),
        })?;
        Ok(Self { patterns, set })
    }

    /// Default watch-list extended with `extra` patterns
    pub fn with_extra(extra: &[String]) -> Result<Self, InterceptError> {
        Self::new(
            DEFAULT_WATCHED_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .chain(extra.iter().cloned()),
        )
    }

    pub fn is_watched(&self, target: &str) -> bool {
        let end = target.find(['?', '#']).unwrap_or(target.len());
        self.set.is_match(&target[..end])
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for WatchedEndpoints {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_WATCHED_PATTERNS.iter().map(|p| p.to_string()).collect(),
            set: RegexSet::new(DEFAULT_WATCHED_PATTERNS)
                .unwrap_or_else(|_| RegexSet::empty()),
        }
    }
}
