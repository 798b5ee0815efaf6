use async_trait::async_trait;
use reqwest::Method;

use crate::intercept::context::InterceptContext;
use crate::intercept::error::InterceptError;
use crate::transport::{ScopedRequest, ScopedResponse};

/// Where a stage sits relative to the transport call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum InterceptStage {
    Request = 0,  // Header tagging, body rewriting
    Response = 1, // Body filtering after the transport returns
}

impl InterceptStage {
    pub fn all() -> [Self; 2] {
        [InterceptStage::Request, InterceptStage::Response]
    }
}

/// Verbs whose bodies carry roster mutations
pub fn is_mutating(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT
}

/// Verbs whose responses are eligible for filtering
pub fn is_read(method: &Method) -> bool {
    *method == Method::GET
}

/// A named stage of the interceptor pipeline.
///
/// Request stages implement `on_request`, response stages `on_response`; the
/// default bodies are no-ops so each stage only writes the side it needs.
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Stage name for logging and debugging
    fn name(&self) -> &'static str;

    fn stage(&self) -> InterceptStage;

    /// Check if the stage applies to this call
    fn applies_to(&self, method: &Method, path: &str) -> bool;

    /// Order within the stage (lower numbers run first)
    fn priority(&self) -> u8 {
        50
    }

    async fn on_request(
        &self,
        _ctx: &InterceptContext,
        _request: &mut ScopedRequest,
    ) -> Result<(), InterceptError> {
        Ok(())
    }

    async fn on_response(
        &self,
        _ctx: &InterceptContext,
        response: ScopedResponse,
    ) -> Result<ScopedResponse, InterceptError> {
        Ok(response)
    }
}
