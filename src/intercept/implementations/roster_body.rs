use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use serde_json::Value;

use crate::filter::retain_members;
use crate::intercept::context::InterceptContext;
use crate::intercept::error::InterceptError;
use crate::intercept::traits::{is_mutating, InterceptStage, Interceptor};
use crate::transport::ScopedRequest;

/// Field of a mutation body that carries a student list
pub const ROSTER_FIELD: &str = "students";

/// Restricts the top-level `students` list of POST/PUT JSON bodies to session
/// members. Only that one field is touched; nested lists are left as sent.
pub struct RosterBodyInterceptor;

impl RosterBodyInterceptor {
    fn looks_like_json(request: &ScopedRequest) -> bool {
        match request.content_type() {
            Some(ct) => ct.to_ascii_lowercase().contains("json"),
            None => !request.body.is_empty(),
        }
    }
}

#[async_trait]
impl Interceptor for RosterBodyInterceptor {
    fn name(&self) -> &'static str {
        "RosterBody"
    }

    fn stage(&self) -> InterceptStage {
        InterceptStage::Request
    }

    fn applies_to(&self, method: &Method, _path: &str) -> bool {
        is_mutating(method)
    }

    async fn on_request(
        &self,
        ctx: &InterceptContext,
        request: &mut ScopedRequest,
    ) -> Result<(), InterceptError> {
        if !Self::looks_like_json(request) {
            return Ok(());
        }

        // Malformed bodies are not ours to judge; send them as-is
        let Ok(mut body) = serde_json::from_slice::<Value>(&request.body) else {
            tracing::debug!("Body of {} {} is not JSON; passing through", ctx.method, ctx.path);
            return Ok(());
        };

        let Some(Value::Array(students)) = body.get(ROSTER_FIELD) else {
            return Ok(());
        };

        let kept = retain_members(students, &ctx.session.members);
        let dropped = students.len() - kept.len();
        if dropped == 0 {
            return Ok(());
        }

        body[ROSTER_FIELD] = Value::Array(kept);
        request.replace_body(Bytes::from(serde_json::to_vec(&body)?));

        tracing::debug!(
            "Stripped {} non-member student(s) from {} {} [{}]",
            dropped, ctx.method, ctx.path, ctx.call_id
        );
        Ok(())
    }
}
