// Transport seam between the interceptor pipeline and the network

pub mod error;
pub mod types;

pub use error::TransportError;
pub use types::{ScopedRequest, ScopedResponse};

use async_trait::async_trait;
use std::time::Duration;

/// Anything that can carry a [`ScopedRequest`] to the upstream API
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ScopedRequest) -> Result<ScopedResponse, TransportError>;
}

/// reqwest-backed transport rooted at an upstream base URL
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: url::Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let base_url = url::Url::parse(base_url).map_err(|e| TransportError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn from_config(config: &crate::config::AppConfig) -> Result<Self, TransportError> {
        Self::new(
            &config.upstream.base_url,
            config.upstream.timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// Append a request target (`/path?query`) to the base URL.
    ///
    /// The target must be a path starting with a single `/`; the scheme, host
    /// and any path prefix of the base URL are always kept.
    pub fn resolve(&self, target: &str) -> Result<url::Url, TransportError> {
        let invalid = |reason: &str| TransportError::InvalidUrl {
            url: target.to_string(),
            reason: reason.to_string(),
        };

        if !target.starts_with('/') || target.starts_with("//") || target.starts_with("/\\") {
            return Err(invalid("target must be a path starting with a single '/'"));
        }

        let target = target.split_once('#').map_or(target, |(before, _)| before);
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };

        let mut url = self.base_url.clone();
        let prefix = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{}{}", prefix, path));
        url.set_query(query);
        url.set_fragment(None);
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ScopedRequest) -> Result<ScopedResponse, TransportError> {
        let url = self.resolve(&request.target)?;
        let url_str = url.to_string();

        tracing::debug!("Transport {} {}", request.method, url_str);

        let response = self
            .client
            .request(request.method, url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&url_str, e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(&url_str, e))?;

        Ok(ScopedResponse { status, headers, body })
    }
}
