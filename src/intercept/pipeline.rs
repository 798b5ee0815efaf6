// Interceptor pipeline composed around a transport

use std::collections::HashMap;
use std::sync::Arc;

use crate::intercept::context::InterceptContext;
use crate::intercept::error::{FailurePolicy, InterceptError};
use crate::intercept::traits::{InterceptStage, Interceptor};
use crate::session::SessionSnapshot;
use crate::transport::{ScopedRequest, ScopedResponse, Transport};

/// Runs request stages, the transport call, then response stages.
///
/// Stage failures are handled by the configured [`FailurePolicy`]. Transport
/// failures are always returned to the caller.
pub struct InterceptorPipeline {
    stages: HashMap<InterceptStage, Vec<Box<dyn Interceptor>>>,
    policy: FailurePolicy,
    header_name: String,
}

impl InterceptorPipeline {
    pub fn new(policy: FailurePolicy, header_name: impl Into<String>) -> Self {
        Self {
            stages: HashMap::new(),
            policy,
            header_name: header_name.into(),
        }
    }

    /// Register a stage; stages are kept sorted by priority within their stage
    pub fn register(&mut self, interceptor: Box<dyn Interceptor>) {
        let stage = interceptor.stage();
        let name = interceptor.name();
        let entries = self.stages.entry(stage).or_default();
        entries.push(interceptor);
        entries.sort_by_key(|i| i.priority());

        tracing::debug!("Registered interceptor '{}' for stage {:?}", name, stage);
    }

    pub fn with(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.register(Box::new(interceptor));
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    /// Names of registered stages in execution order
    pub fn stage_names(&self) -> Vec<&'static str> {
        InterceptStage::all()
            .iter()
            .filter_map(|stage| self.stages.get(stage))
            .flat_map(|entries| entries.iter().map(|i| i.name()))
            .collect()
    }

    pub async fn execute(
        &self,
        transport: &dyn Transport,
        session: Arc<SessionSnapshot>,
        request: ScopedRequest,
    ) -> Result<ScopedResponse, InterceptError> {
        let ctx = InterceptContext::new(
            request.method.clone(),
            request.path().to_string(),
            session,
            self.header_name.clone(),
        );

        tracing::debug!("Intercepting {} {} [{}]", ctx.method, request.target, ctx.call_id);

        // Phase 1: request stages
        let original = request.clone();
        let outgoing = match self.run_request_stages(&ctx, request).await {
            Ok(rewritten) => rewritten,
            Err(error) => match self.policy {
                FailurePolicy::Open => {
                    tracing::warn!(
                        "Request interception failed for {} [{}]: {}; sending unmodified request",
                        ctx.path, ctx.call_id, error
                    );
                    original
                }
                FailurePolicy::Closed => return Err(error),
            },
        };

        // Phase 2: transport, errors always propagate
        let response = transport.send(outgoing).await?;

        // Phase 3: response stages
        let unmodified = response.clone();
        let result = match self.run_response_stages(&ctx, response).await {
            Ok(filtered) => filtered,
            Err(error) => match self.policy {
                FailurePolicy::Open => {
                    tracing::warn!(
                        "Response interception failed for {} [{}]: {}; returning unmodified response",
                        ctx.path, ctx.call_id, error
                    );
                    unmodified
                }
                FailurePolicy::Closed => return Err(error),
            },
        };

        tracing::debug!(
            "Completed {} {} -> {} in {:?} [{}]",
            ctx.method, ctx.path, result.status, ctx.execution_time(), ctx.call_id
        );

        Ok(result)
    }

    async fn run_request_stages(
        &self,
        ctx: &InterceptContext,
        mut request: ScopedRequest,
    ) -> Result<ScopedRequest, InterceptError> {
        for interceptor in self.applicable(InterceptStage::Request, ctx) {
            interceptor.on_request(ctx, &mut request).await?;
            tracing::trace!("Interceptor {} completed for {}", interceptor.name(), ctx.path);
        }
        Ok(request)
    }

    async fn run_response_stages(
        &self,
        ctx: &InterceptContext,
        mut response: ScopedResponse,
    ) -> Result<ScopedResponse, InterceptError> {
        for interceptor in self.applicable(InterceptStage::Response, ctx) {
            response = interceptor.on_response(ctx, response).await?;
            tracing::trace!("Interceptor {} completed for {}", interceptor.name(), ctx.path);
        }
        Ok(response)
    }

    fn applicable<'a>(
        &'a self,
        stage: InterceptStage,
        ctx: &'a InterceptContext,
    ) -> impl Iterator<Item = &'a Box<dyn Interceptor>> + 'a {
        self.stages
            .get(&stage)
            .into_iter()
            .flatten()
            .filter(move |i| {
                let applies = i.applies_to(&ctx.method, &ctx.path);
                if !applies {
                    tracing::trace!("Interceptor {} skipped for {} {}", i.name(), ctx.method, ctx.path);
                }
                applies
            })
    }
}
