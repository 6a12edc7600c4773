//! Orchestrator — the entry points the HTTP layer calls.
//!
//! Builds a fresh `PipelineState` per request, archives the request
//! best-effort, picks the workflow graph, runs it synchronously, and projects
//! the final state's artifact paths into the caller-facing shape.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::db::jobs::{JobArchive, JobRecord};
use crate::errors::AppError;
use crate::pipeline::{workflow, PipelineServices, PipelineState};

#[derive(Debug, Clone)]
pub struct GenerateDocumentsRequest {
    pub job_posting: String,
    pub company: String,
    pub position: String,
}

#[derive(Debug, Clone)]
pub struct GenerateCoverLetterRequest {
    pub job_posting: String,
    pub company: String,
    pub position: String,
    pub resume_pdf: PathBuf,
}

/// Artifact locations of a completed run. A populated source path with a
/// `None` PDF path means the typesetting toolchain failed non-fatally.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentPaths {
    pub resume_pdf_path: Option<PathBuf>,
    pub cover_letter_pdf_path: Option<PathBuf>,
    pub job_id: Option<i64>,
}

/// Generates a tailored résumé and cover letter.
pub async fn generate_documents(
    services: &PipelineServices,
    archive: &dyn JobArchive,
    request: GenerateDocumentsRequest,
) -> Result<DocumentPaths, AppError> {
    validate_inputs(&request.job_posting, &request.company, &request.position)?;

    let job_id = archive_request(
        archive,
        &request.job_posting,
        &request.company,
        &request.position,
        true,
    )
    .await;

    info!(
        "Generating resume and cover letter for {} at {}",
        request.position, request.company
    );

    let mut state =
        PipelineState::for_resume(request.job_posting, request.company, request.position);
    workflow::resume_with_cover_letter(services)
        .run(&mut state)
        .await?;

    Ok(DocumentPaths {
        resume_pdf_path: state.resume_pdf_file,
        cover_letter_pdf_path: state.cover_letter_pdf_file,
        job_id,
    })
}

/// Generates only a cover letter, drawing on an existing résumé artifact.
pub async fn generate_cover_letter(
    services: &PipelineServices,
    archive: &dyn JobArchive,
    request: GenerateCoverLetterRequest,
) -> Result<DocumentPaths, AppError> {
    validate_inputs(&request.job_posting, &request.company, &request.position)?;

    let metadata = tokio::fs::metadata(&request.resume_pdf).await.map_err(|_| {
        AppError::NotFound(format!(
            "Resume file not found: {}",
            request.resume_pdf.display()
        ))
    })?;
    if !metadata.is_file() {
        return Err(AppError::Validation(format!(
            "Resume path is not a file: {}",
            request.resume_pdf.display()
        )));
    }

    let job_id = archive_request(
        archive,
        &request.job_posting,
        &request.company,
        &request.position,
        false,
    )
    .await;

    info!(
        "Generating cover letter for {} at {}",
        request.position, request.company
    );

    let mut state = PipelineState::for_cover_letter(
        request.job_posting,
        request.company,
        request.position,
        request.resume_pdf.clone(),
    );
    workflow::cover_letter_only(services).run(&mut state).await?;

    Ok(DocumentPaths {
        resume_pdf_path: Some(request.resume_pdf),
        cover_letter_pdf_path: state.cover_letter_pdf_file,
        job_id,
    })
}

fn validate_inputs(job_posting: &str, company: &str, position: &str) -> Result<(), AppError> {
    if job_posting.trim().is_empty() || company.trim().is_empty() || position.trim().is_empty() {
        return Err(AppError::Validation(
            "job posting, company, and position must all be non-empty".to_string(),
        ));
    }
    Ok(())
}

/// Best-effort request archiving. A failure is logged and never aborts the
/// generation pipeline.
async fn archive_request(
    archive: &dyn JobArchive,
    job_posting: &str,
    company: &str,
    position: &str,
    resume_generated: bool,
) -> Option<i64> {
    let record = JobRecord {
        company_name: company.to_string(),
        position_title: position.to_string(),
        job_description: job_posting.to_string(),
        resume_generated,
    };

    match archive.record(&record).await {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("Failed to archive job application: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::pipeline::testing::{stub_services, ScriptedGenerator};

    struct StubArchive {
        fail: bool,
        recorded: Mutex<Vec<JobRecord>>,
    }

    impl StubArchive {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                recorded: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl JobArchive for StubArchive {
        async fn record(&self, job: &JobRecord) -> Result<i64, AppError> {
            if self.fail {
                return Err(AppError::Database(sqlx::Error::PoolTimedOut));
            }
            self.recorded.lock().unwrap().push(job.clone());
            Ok(42)
        }
    }

    fn request() -> GenerateDocumentsRequest {
        GenerateDocumentsRequest {
            job_posting: "A Rust job posting".to_string(),
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
        }
    }

    #[tokio::test]
    async fn test_generate_documents_returns_artifact_paths() {
        let catalog_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let (services, _) = stub_services(
            catalog_dir.path(),
            output_dir.path(),
            Arc::new(ScriptedGenerator::default()),
            false,
        )
        .await;
        let archive = StubArchive::new(false);

        let paths = generate_documents(&services, &archive, request())
            .await
            .unwrap();

        assert!(paths.resume_pdf_path.is_some());
        assert!(paths.cover_letter_pdf_path.is_some());
        assert_eq!(paths.job_id, Some(42));

        let recorded = archive.recorded.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert!(recorded[0].resume_generated);
    }

    #[tokio::test]
    async fn test_archive_failure_does_not_abort_generation() {
        let catalog_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let (services, _) = stub_services(
            catalog_dir.path(),
            output_dir.path(),
            Arc::new(ScriptedGenerator::default()),
            false,
        )
        .await;
        let archive = StubArchive::new(true);

        let paths = generate_documents(&services, &archive, request())
            .await
            .unwrap();

        assert!(paths.resume_pdf_path.is_some());
        assert_eq!(paths.job_id, None);
    }

    #[tokio::test]
    async fn test_empty_inputs_rejected() {
        let catalog_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let (services, _) = stub_services(
            catalog_dir.path(),
            output_dir.path(),
            Arc::new(ScriptedGenerator::default()),
            false,
        )
        .await;
        let archive = StubArchive::new(false);

        let mut bad = request();
        bad.company = "   ".to_string();
        let err = generate_documents(&services, &archive, bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(archive.recorded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cover_letter_requires_readable_resume() {
        let catalog_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let (services, _) = stub_services(
            catalog_dir.path(),
            output_dir.path(),
            Arc::new(ScriptedGenerator::default()),
            false,
        )
        .await;
        let archive = StubArchive::new(false);

        let err = generate_cover_letter(
            &services,
            &archive,
            GenerateCoverLetterRequest {
                job_posting: "A Rust job posting".to_string(),
                company: "Acme".to_string(),
                position: "Engineer".to_string(),
                resume_pdf: "/nonexistent/resume.pdf".into(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        // Validation happens before the archive side effect
        assert!(archive.recorded.lock().unwrap().is_empty());
    }
}
