use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

use crate::intercept::FailurePolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub upstream: UpstreamConfig,
    pub session: SessionConfig,
    pub filter: FilterConfig,
    pub proxy: ProxyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// Transport timeout; `None` leaves cancellation to the caller
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub session_id: String,
    pub header_name: String,
    /// Collection path; the detail endpoint is `{session_path}/{id}`
    pub session_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub failure_policy: FailurePolicy,
    /// Additional watched path patterns (regular expressions)
    pub extra_watched: Vec<String>,
    pub debug_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub port: u16,
    pub enable_cors: bool,
    pub max_request_size_bytes: usize,
}

pub const DEFAULT_SESSION_HEADER: &str = "X-Session-ID";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Upstream overrides
        if let Ok(v) = env::var("SCOPE_UPSTREAM_URL") {
            self.upstream.base_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("SCOPE_UPSTREAM_TIMEOUT_SECS") {
            self.upstream.timeout_secs = v.parse().ok();
        }

        // Session overrides
        if let Ok(v) = env::var("SCOPE_SESSION_ID") {
            self.session.session_id = v.trim().to_string();
        }
        if let Ok(v) = env::var("SCOPE_SESSION_HEADER") {
            self.session.header_name = v;
        }
        if let Ok(v) = env::var("SCOPE_SESSION_PATH") {
            self.session.session_path = v.trim_end_matches('/').to_string();
        }

        // Filter overrides
        if let Ok(v) = env::var("SCOPE_FAILURE_POLICY") {
            self.filter.failure_policy = v.parse().unwrap_or(self.filter.failure_policy);
        }
        if let Ok(v) = env::var("SCOPE_EXTRA_WATCHED") {
            self.filter.extra_watched = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("SCOPE_DEBUG_LOGGING") {
            self.filter.debug_logging = v.parse().unwrap_or(self.filter.debug_logging);
        }

        // Proxy overrides
        if let Some(port) = env::var("SCOPE_PROXY_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.proxy.port = port;
        }
        if let Ok(v) = env::var("SCOPE_ENABLE_CORS") {
            self.proxy.enable_cors = v.parse().unwrap_or(self.proxy.enable_cors);
        }
        if let Ok(v) = env::var("SCOPE_MAX_REQUEST_SIZE_BYTES") {
            self.proxy.max_request_size_bytes = v.parse().unwrap_or(self.proxy.max_request_size_bytes);
        }

        self
    }

    fn base() -> Self {
        Self {
            environment: Environment::Development,
            upstream: UpstreamConfig {
                base_url: "http://localhost:5000".to_string(),
                timeout_secs: None,
            },
            session: SessionConfig {
                session_id: String::new(),
                header_name: DEFAULT_SESSION_HEADER.to_string(),
                session_path: "/api/sessions".to_string(),
            },
            filter: FilterConfig {
                failure_policy: FailurePolicy::Open,
                extra_watched: Vec::new(),
                debug_logging: false,
            },
            proxy: ProxyConfig {
                port: 3000,
                enable_cors: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
        }
    }

    pub fn development() -> Self {
        let mut config = Self::base();
        config.filter.debug_logging = true;
        config
    }

    fn staging() -> Self {
        let mut config = Self::base();
        config.environment = Environment::Staging;
        config.upstream.timeout_secs = Some(30);
        config.proxy.max_request_size_bytes = 5 * 1024 * 1024;
        config
    }

    fn production() -> Self {
        let mut config = Self::base();
        config.environment = Environment::Production;
        config.upstream.timeout_secs = Some(15);
        config.proxy.enable_cors = false;
        config.proxy.max_request_size_bytes = 2 * 1024 * 1024;
        config
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}
