pub mod generate;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation API
        .route("/api/v1/generate", post(generate::handle_generate))
        .route(
            "/api/v1/generate/cover-letter",
            post(generate::handle_generate_cover_letter),
        )
        // Archived-application lookup
        .route("/api/v1/jobs/similar", post(generate::handle_similar_jobs))
        .with_state(state)
}
