use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::errors::AppError;
use crate::extract;
use crate::llm_client::TextGenerator;
use crate::pipeline::prompts::HIGHLIGHTS_PROMPT_TEMPLATE;
use crate::pipeline::{PipelineServices, PipelineState, Stage};

/// Synthesizes the highlight-of-qualifications section from everything the
/// earlier stages produced.
pub struct GenerateHighlights {
    llm: Arc<dyn TextGenerator>,
}

impl GenerateHighlights {
    pub fn new(services: &PipelineServices) -> Self {
        Self {
            llm: services.llm.clone(),
        }
    }
}

#[async_trait]
impl Stage for GenerateHighlights {
    fn name(&self) -> &'static str {
        "generate_highlights"
    }

    async fn run(&self, state: &mut PipelineState) -> Result<(), AppError> {
        let prompt = HIGHLIGHTS_PROMPT_TEMPLATE
            .replace("{job}", &state.job_posting)
            .replace("{experiences}", &state.experiences)
            .replace("{skills}", &state.skills)
            .replace("{projects}", &state.project_summaries);

        let response = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| AppError::Llm(format!("Highlights generation failed: {e}")))?;

        let extracted = extract::highlight_items(&response);
        state.note_issues(self.name(), &extracted.issues);
        state.note("highlights_chars", extracted.content.len());
        info!("Generated highlights ({} chars)", extracted.content.len());

        state.highlights = extracted.content;
        Ok(())
    }
}
