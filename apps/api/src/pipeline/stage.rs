use async_trait::async_trait;

use crate::errors::AppError;
use crate::pipeline::PipelineState;

/// One unit of work in a workflow: read state fields, call a collaborator,
/// extract structure from the response, write state fields back.
///
/// Stages are stateless beyond their injected collaborator handles; all
/// workflow data lives in `PipelineState`. Errors propagate untouched — the
/// workflow loop wraps them with the failing stage's identity.
#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, state: &mut PipelineState) -> Result<(), AppError>;
}
