use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use serde_json::Value;

use crate::filter::PayloadFilter;
use crate::intercept::context::InterceptContext;
use crate::intercept::error::InterceptError;
use crate::intercept::traits::{is_read, InterceptStage, Interceptor};
use crate::intercept::watch::WatchedEndpoints;
use crate::transport::ScopedResponse;

/// Prunes non-member entities from GET responses of watched endpoints.
/// The rebuilt response keeps the original status and headers.
pub struct WatchedResponseInterceptor {
    watched: WatchedEndpoints,
}

impl WatchedResponseInterceptor {
    pub fn new(watched: WatchedEndpoints) -> Self {
        Self { watched }
    }
}

impl Default for WatchedResponseInterceptor {
    fn default() -> Self {
        Self::new(WatchedEndpoints::default())
    }
}

#[async_trait]
impl Interceptor for WatchedResponseInterceptor {
    fn name(&self) -> &'static str {
        "WatchedResponse"
    }

    fn stage(&self) -> InterceptStage {
        InterceptStage::Response
    }

    fn applies_to(&self, method: &Method, path: &str) -> bool {
        is_read(method) && self.watched.is_watched(path)
    }

    async fn on_response(
        &self,
        ctx: &InterceptContext,
        response: ScopedResponse,
    ) -> Result<ScopedResponse, InterceptError> {
        let parsed = match serde_json::from_slice::<Value>(&response.body) {
            Ok(value) => value,
            Err(_) => {
                tracing::debug!("Response of {} is not JSON; returning it unmodified", ctx.path);
                return Ok(response);
            }
        };

        let filtered = PayloadFilter::new(&ctx.session.members).apply(&parsed);
        if filtered.removed == 0 {
            return Ok(response);
        }

        let body = Bytes::from(serde_json::to_vec(&filtered.value)?);
        tracing::debug!(
            "Pruned {} non-member entit{} from {} [{}]",
            filtered.removed,
            if filtered.removed == 1 { "y" } else { "ies" },
            ctx.path,
            ctx.call_id
        );
        Ok(response.with_replaced_body(body))
    }
}
