use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobApplicationRow {
    pub id: i64,
    pub company_name: String,
    pub position_title: String,
    pub job_description: String,
    pub resume_generated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A job application paired with its similarity to a query description.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarJob {
    #[serde(flatten)]
    pub job: JobApplicationRow,
    /// Cosine similarity in [0, 1].
    pub similarity: f64,
}
