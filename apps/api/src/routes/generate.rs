use std::path::PathBuf;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::job::SimilarJob;
use crate::orchestrator::{
    self, GenerateCoverLetterRequest, GenerateDocumentsRequest,
};
use crate::state::AppState;

const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;
const DEFAULT_SIMILAR_LIMIT: i64 = 5;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    pub job_description: String,
    pub company_name: String,
    pub position_title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCoverLetterBody {
    pub job_description: String,
    pub company_name: String,
    pub position_title: String,
    pub resume_pdf_file: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub status: &'static str,
    pub resume_path: Option<PathBuf>,
    pub cover_letter_path: Option<PathBuf>,
    pub job_id: Option<i64>,
}

/// POST /api/v1/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateResponse>, AppError> {
    let paths = orchestrator::generate_documents(
        &state.services,
        state.jobs.as_ref(),
        GenerateDocumentsRequest {
            job_posting: body.job_description,
            company: body.company_name,
            position: body.position_title,
        },
    )
    .await?;

    Ok(Json(GenerateResponse {
        status: "success",
        resume_path: paths.resume_pdf_path,
        cover_letter_path: paths.cover_letter_pdf_path,
        job_id: paths.job_id,
    }))
}

/// POST /api/v1/generate/cover-letter
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    Json(body): Json<GenerateCoverLetterBody>,
) -> Result<Json<GenerateResponse>, AppError> {
    let paths = orchestrator::generate_cover_letter(
        &state.services,
        state.jobs.as_ref(),
        GenerateCoverLetterRequest {
            job_posting: body.job_description,
            company: body.company_name,
            position: body.position_title,
            resume_pdf: body.resume_pdf_file,
        },
    )
    .await?;

    Ok(Json(GenerateResponse {
        status: "success",
        resume_path: paths.resume_pdf_path,
        cover_letter_path: paths.cover_letter_pdf_path,
        job_id: paths.job_id,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarJobsBody {
    pub job_description: String,
    pub threshold: Option<f64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SimilarJobsResponse {
    pub jobs: Vec<SimilarJob>,
}

/// POST /api/v1/jobs/similar
pub async fn handle_similar_jobs(
    State(state): State<AppState>,
    Json(body): Json<SimilarJobsBody>,
) -> Result<Json<SimilarJobsResponse>, AppError> {
    if body.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job description must be non-empty".to_string(),
        ));
    }

    let jobs = state
        .jobs
        .find_similar(
            &body.job_description,
            body.threshold.unwrap_or(DEFAULT_SIMILARITY_THRESHOLD),
            body.limit.unwrap_or(DEFAULT_SIMILAR_LIMIT),
        )
        .await?;

    Ok(Json(SimilarJobsResponse { jobs }))
}
