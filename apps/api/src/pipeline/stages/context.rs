use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use tracing::info;

use crate::errors::AppError;
use crate::pipeline::stages::excerpt;
use crate::pipeline::{PipelineServices, PipelineState, Stage};
use crate::retrieval::{ContextDocument, ContextStore};

const JOB_QUERY_CHARS: usize = 500;
const EXPERIENCE_QUERY_CHARS: usize = 300;
const RESUME_QUERY_CHARS: usize = 500;

// ────────────────────────────────────────────────────────────────────────────
// Context retrieval
// ────────────────────────────────────────────────────────────────────────────

/// Builds a composite query from whichever state fields are present and runs
/// a similarity search. In the résumé workflow the freshly generated skills
/// and experiences sharpen the query; in cover-letter-only mode the loaded
/// résumé text stands in for them.
pub struct RetrieveContext {
    store: Arc<dyn ContextStore>,
    k: usize,
}

impl RetrieveContext {
    pub fn new(services: &PipelineServices) -> Self {
        Self {
            store: services.store.clone(),
            k: services.num_context_docs,
        }
    }

    fn build_query(state: &PipelineState) -> String {
        let mut parts: Vec<String> = Vec::new();

        if !state.job_posting.is_empty() {
            parts.push(excerpt(&state.job_posting, JOB_QUERY_CHARS).to_string());
        }
        if !state.company.is_empty() {
            parts.push(format!("company: {}", state.company));
        }
        if !state.position.is_empty() {
            parts.push(format!("position: {}", state.position));
        }

        if !state.skills.is_empty() || !state.experiences.is_empty() {
            if !state.skills.is_empty() {
                parts.push(format!("technical skills: {}", state.skills));
            }
            if !state.experiences.is_empty() {
                parts.push(format!(
                    "experience: {}",
                    excerpt(&state.experiences, EXPERIENCE_QUERY_CHARS)
                ));
            }
        } else if !state.resume_text.is_empty() {
            parts.push(format!(
                "resume: {}",
                excerpt(&state.resume_text, RESUME_QUERY_CHARS)
            ));
        }

        parts.join(" ")
    }
}

#[async_trait]
impl Stage for RetrieveContext {
    fn name(&self) -> &'static str {
        "retrieve_context"
    }

    async fn run(&self, state: &mut PipelineState) -> Result<(), AppError> {
        let query = Self::build_query(state);
        let documents = self.store.search(&query, self.k).await?;

        info!("Retrieved {} context documents", documents.len());
        state.note("context_documents", documents.len());
        state.context = documents;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cover-letter indexing
// ────────────────────────────────────────────────────────────────────────────

/// Feeds the generated cover letter back into the document store so future
/// letters can draw on it.
pub struct IndexCoverLetter {
    store: Arc<dyn ContextStore>,
}

impl IndexCoverLetter {
    pub fn new(services: &PipelineServices) -> Self {
        Self {
            store: services.store.clone(),
        }
    }
}

#[async_trait]
impl Stage for IndexCoverLetter {
    fn name(&self) -> &'static str {
        "index_cover_letter"
    }

    async fn run(&self, state: &mut PipelineState) -> Result<(), AppError> {
        let document = ContextDocument::new(state.cover_letter.clone())
            .with_metadata("source", "cover letter")
            .with_metadata("company", state.company.clone())
            .with_metadata("position", state.position.clone());

        self.store.add(vec![document]).await?;
        info!("Indexed cover letter for future retrieval");
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Résumé loading (cover-letter-only mode)
// ────────────────────────────────────────────────────────────────────────────

/// Extracts the text of an existing résumé PDF. Unlike typesetting, a failure
/// here is a hard error — without résumé text there is nothing to write a
/// cover letter from.
pub struct LoadResume;

#[async_trait]
impl Stage for LoadResume {
    fn name(&self) -> &'static str {
        "load_resume"
    }

    async fn run(&self, state: &mut PipelineState) -> Result<(), AppError> {
        let path = state.resume_pdf.clone().ok_or_else(|| {
            AppError::Validation("No resume artifact provided for cover-letter-only mode".to_string())
        })?;

        // pdf-extract is synchronous; keep it off the async workers.
        let display = path.display().to_string();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path))
            .await
            .map_err(|e| AppError::Internal(anyhow!("PDF extraction task failed: {e}")))?
            .map_err(|e| AppError::Validation(format!("Could not read resume PDF {display}: {e}")))?;

        if text.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "Resume PDF {display} contains no extractable text"
            )));
        }

        info!("Loaded resume text ({} chars)", text.len());
        state.note("resume_text_chars", text.len());
        state.resume_text = text;
        Ok(())
    }
}
