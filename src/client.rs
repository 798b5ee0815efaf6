// Session-scoped client: every call goes through the interceptor pipeline

use serde_json::Value;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::ScopeError;
use crate::intercept::{
    InterceptorPipeline, RosterBodyInterceptor, SessionHeaderInterceptor, WatchedEndpoints,
    WatchedResponseInterceptor,
};
use crate::session::{SessionContext, SessionError, SessionSnapshot};
use crate::transport::{HttpTransport, ScopedRequest, ScopedResponse, Transport};

/// Owns the session context, the pipeline and the transport.
/// Built once at start-up and shared behind an `Arc`.
pub struct ScopedClient {
    session: SessionContext,
    pipeline: InterceptorPipeline,
    transport: Arc<dyn Transport>,
    session_path: String,
}

impl ScopedClient {
    pub fn new(
        session_id: impl Into<String>,
        pipeline: InterceptorPipeline,
        transport: Arc<dyn Transport>,
        session_path: impl Into<String>,
    ) -> Self {
        Self {
            session: SessionContext::new(session_id),
            pipeline,
            transport,
            session_path: session_path.into(),
        }
    }

    /// Standard pipeline (session header, roster body, watched responses)
    /// over an HTTP transport, as configured
    pub fn from_config(config: &AppConfig) -> Result<Self, ScopeError> {
        let transport = HttpTransport::from_config(config)?;
        let pipeline = Self::standard_pipeline(config)?;
        Ok(Self::new(
            config.session.session_id.clone(),
            pipeline,
            Arc::new(transport),
            config.session.session_path.clone(),
        ))
    }

    pub fn standard_pipeline(config: &AppConfig) -> Result<InterceptorPipeline, ScopeError> {
        let watched = WatchedEndpoints::with_extra(&config.filter.extra_watched)?;
        Ok(
            InterceptorPipeline::new(config.filter.failure_policy, config.session.header_name.clone())
                .with(SessionHeaderInterceptor)
                .with(RosterBodyInterceptor)
                .with(WatchedResponseInterceptor::new(watched)),
        )
    }

    pub fn session(&self) -> Arc<SessionSnapshot> {
        self.session.snapshot()
    }

    pub fn pipeline(&self) -> &InterceptorPipeline {
        &self.pipeline
    }

    /// Send a call through the pipeline against the current snapshot
    pub async fn send(&self, request: ScopedRequest) -> Result<ScopedResponse, ScopeError> {
        let snapshot = self.session.snapshot();
        Ok(self
            .pipeline
            .execute(self.transport.as_ref(), snapshot, request)
            .await?)
    }

    /// Re-load the roster from the session detail endpoint and swap it in.
    /// On any failure the current snapshot is kept and the error returned.
    pub async fn refresh_session(&self) -> Result<Arc<SessionSnapshot>, ScopeError> {
        let session_id = self.session.session_id();
        if session_id.is_empty() {
            return Err(SessionError::MissingSessionId.into());
        }

        let target = detail_target(&self.session_path, &session_id)?;
        let response = self.send(ScopedRequest::get(target)).await?;
        if !response.is_success() {
            return Err(SessionError::Status {
                session_id,
                status: response.status.as_u16(),
            }
            .into());
        }

        let payload: Value = response.json().map_err(SessionError::from)?;
        let snapshot = SessionSnapshot::from_detail(&session_id, &payload)?;

        tracing::info!(
            "Session '{}' loaded: {} member(s){}",
            session_id,
            snapshot.members.len(),
            snapshot
                .name
                .as_ref()
                .map(|n| format!(" ({})", n))
                .unwrap_or_default()
        );

        Ok(self.session.replace(snapshot))
    }

    /// Start-up refresh: failures leave the roster empty and are only logged
    pub async fn refresh_or_keep(&self) -> Arc<SessionSnapshot> {
        match self.refresh_session().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Session refresh failed, keeping current roster: {}", e);
                self.session.snapshot()
            }
        }
    }
}

/// `{session_path}/{id}` with the id percent-encoded as a single path segment
fn detail_target(session_path: &str, session_id: &str) -> Result<String, SessionError> {
    // Dot segments would be dropped by the URL parser and hit the collection
    if matches!(session_id, "." | "..") {
        return Err(SessionError::InvalidSessionId(session_id.to_string()));
    }
    let mut url = url::Url::parse("http://upstream.invalid/")
        .map_err(|e| SessionError::Malformed(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| SessionError::Malformed("session path cannot take segments".to_string()))?
        .clear()
        .extend(session_path.split('/').filter(|segment| !segment.is_empty()))
        .push(session_id);
    Ok(url.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_target_appends_session_id() {
        assert_eq!(detail_target("/api/sessions", "sess_1").unwrap(), "/api/sessions/sess_1");
        assert_eq!(detail_target("/api/sessions/", "sess_1").unwrap(), "/api/sessions/sess_1");
    }

    #[test]
    fn detail_target_encodes_reserved_characters() {
        assert_eq!(
            detail_target("/api/sessions", "a/b?c#d").unwrap(),
            "/api/sessions/a%2Fb%3Fc%23d"
        );
        assert!(matches!(
            detail_target("/api/sessions", ".."),
            Err(SessionError::InvalidSessionId(_))
        ));
    }
}
