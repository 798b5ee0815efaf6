use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;

use crate::intercept::context::InterceptContext;
use crate::intercept::error::InterceptError;
use crate::intercept::traits::{InterceptStage, Interceptor};
use crate::transport::ScopedRequest;

/// Tags every outgoing call with the active session id.
/// A header of the same name already set by the caller is left alone.
pub struct SessionHeaderInterceptor;

#[async_trait]
impl Interceptor for SessionHeaderInterceptor {
    fn name(&self) -> &'static str {
        "SessionHeader"
    }

    fn stage(&self) -> InterceptStage {
        InterceptStage::Request
    }

    fn applies_to(&self, _method: &Method, _path: &str) -> bool {
        true
    }

    fn priority(&self) -> u8 {
        10
    }

    async fn on_request(
        &self,
        ctx: &InterceptContext,
        request: &mut ScopedRequest,
    ) -> Result<(), InterceptError> {
        let session_id = &ctx.session.session_id;
        if session_id.is_empty() {
            tracing::trace!("No session id; leaving {} untagged", ctx.path);
            return Ok(());
        }

        let name = HeaderName::from_bytes(ctx.header_name.as_bytes()).map_err(|e| {
            InterceptError::InvalidHeader {
                header: ctx.header_name.clone(),
                reason: e.to_string(),
            }
        })?;

        if request.headers.contains_key(&name) {
            tracing::debug!("Caller supplied {}; not overwriting", name);
            return Ok(());
        }

        let value = HeaderValue::from_str(session_id).map_err(|e| InterceptError::InvalidHeader {
            header: ctx.header_name.clone(),
            reason: e.to_string(),
        })?;
        request.headers.insert(name, value);
        Ok(())
    }
}
