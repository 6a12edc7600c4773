//! Job-application archive.
//!
//! Recording a request is a best-effort side effect at the orchestrator
//! boundary — the pipeline must not notice archive failures. Stored
//! embeddings also power the similar-applications lookup.

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::{FromRow, PgPool};
use tracing::info;

use crate::errors::AppError;
use crate::models::job::{JobApplicationRow, SimilarJob};
use crate::retrieval::embeddings::EMBEDDING_DIM;
use crate::retrieval::EmbeddingClient;

/// One generation request, as archived.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub company_name: String,
    pub position_title: String,
    pub job_description: String,
    pub resume_generated: bool,
}

/// The persistence collaborator consumed by the orchestrator.
#[async_trait]
pub trait JobArchive: Send + Sync {
    async fn record(&self, job: &JobRecord) -> Result<i64, AppError>;
}

#[derive(FromRow)]
struct SimilarJobRow {
    #[sqlx(flatten)]
    job: JobApplicationRow,
    similarity: f64,
}

pub struct PgJobStore {
    pool: PgPool,
    embedder: EmbeddingClient,
}

impl PgJobStore {
    pub fn new(pool: PgPool, embedder: EmbeddingClient) -> Self {
        Self { pool, embedder }
    }

    /// Creates the job_applications table and the vector extension if absent.
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(pool)
            .await?;

        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS job_applications (
                id BIGSERIAL PRIMARY KEY,
                company_name TEXT NOT NULL,
                position_title TEXT NOT NULL,
                job_description TEXT NOT NULL,
                embedding vector({EMBEDDING_DIM}),
                resume_generated BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                UNIQUE (company_name, position_title)
            )
            "#
        ))
        .execute(pool)
        .await?;

        Ok(())
    }

    /// The text embedded for a job application. Must stay aligned with the
    /// query side of `find_similar`.
    fn embedding_text(job: &JobRecord) -> String {
        format!(
            "Company: {}\nPosition: {}\n{}",
            job.company_name, job.position_title, job.job_description
        )
    }

    /// Finds archived applications whose embedding is within `threshold`
    /// cosine similarity of the given description, most similar first.
    pub async fn find_similar(
        &self,
        description: &str,
        threshold: f64,
        limit: i64,
    ) -> Result<Vec<SimilarJob>, AppError> {
        let embedding = Vector::from(self.embedder.embed(description).await?);

        let rows: Vec<SimilarJobRow> = sqlx::query_as(
            r#"
            SELECT id, company_name, position_title, job_description,
                   resume_generated, created_at, updated_at,
                   1 - (embedding <=> $1) AS similarity
            FROM job_applications
            WHERE embedding IS NOT NULL
              AND 1 - (embedding <=> $1) >= $2
            ORDER BY embedding <=> $1
            LIMIT $3
            "#,
        )
        .bind(&embedding)
        .bind(threshold)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| SimilarJob {
                job: r.job,
                similarity: r.similarity,
            })
            .collect())
    }
}

#[async_trait]
impl JobArchive for PgJobStore {
    async fn record(&self, job: &JobRecord) -> Result<i64, AppError> {
        let embedding = Vector::from(self.embedder.embed(&Self::embedding_text(job)).await?);

        // A repeat application for the same company/position refreshes the
        // stored description instead of erroring on the unique constraint.
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO job_applications
                (company_name, position_title, job_description, embedding, resume_generated)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (company_name, position_title)
            DO UPDATE SET job_description = EXCLUDED.job_description,
                          embedding = EXCLUDED.embedding,
                          resume_generated = job_applications.resume_generated
                              OR EXCLUDED.resume_generated,
                          updated_at = now()
            RETURNING id
            "#,
        )
        .bind(&job.company_name)
        .bind(&job.position_title)
        .bind(&job.job_description)
        .bind(&embedding)
        .bind(job.resume_generated)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Archived application {} for {} at {}",
            id, job.position_title, job.company_name
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_text_carries_all_identity_fields() {
        let record = JobRecord {
            company_name: "Acme".to_string(),
            position_title: "Engineer".to_string(),
            job_description: "Build systems in Rust.".to_string(),
            resume_generated: true,
        };
        let text = PgJobStore::embedding_text(&record);
        assert!(text.contains("Company: Acme"));
        assert!(text.contains("Position: Engineer"));
        assert!(text.contains("Build systems in Rust."));
    }
}
