use std::sync::Arc;

use crate::db::jobs::PgJobStore;
use crate::pipeline::PipelineServices;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Job-application archive; doubles as the best-effort persistence
    /// collaborator and the similar-applications lookup.
    pub jobs: Arc<PgJobStore>,
    /// Collaborator handles every workflow is built from.
    pub services: PipelineServices,
}
