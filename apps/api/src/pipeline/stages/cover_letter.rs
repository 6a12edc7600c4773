use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::errors::AppError;
use crate::extract;
use crate::llm_client::TextGenerator;
use crate::pipeline::prompts::{
    COVER_LETTER_FROM_RESUME_PROMPT_TEMPLATE, COVER_LETTER_PROMPT_TEMPLATE,
};
use crate::pipeline::{PipelineServices, PipelineState, Stage};

/// Generates the cover-letter body, either from the freshly generated résumé
/// sections (résumé workflow) or from a loaded résumé (cover-letter-only).
pub struct GenerateCoverLetter {
    llm: Arc<dyn TextGenerator>,
    with_resume_sections: bool,
}

impl GenerateCoverLetter {
    /// Résumé workflow variant: draws on the sections earlier stages produced.
    pub fn with_resume_sections(services: &PipelineServices) -> Self {
        Self {
            llm: services.llm.clone(),
            with_resume_sections: true,
        }
    }

    /// Cover-letter-only variant: draws on the loaded résumé text instead.
    pub fn from_loaded_resume(services: &PipelineServices) -> Self {
        Self {
            llm: services.llm.clone(),
            with_resume_sections: false,
        }
    }
}

#[async_trait]
impl Stage for GenerateCoverLetter {
    fn name(&self) -> &'static str {
        "generate_cover_letter"
    }

    async fn run(&self, state: &mut PipelineState) -> Result<(), AppError> {
        let context_text = state
            .context
            .iter()
            .map(|d| d.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = if self.with_resume_sections {
            COVER_LETTER_PROMPT_TEMPLATE
                .replace("{position}", &state.position)
                .replace("{company}", &state.company)
                .replace("{job}", &state.job_posting)
                .replace("{highlights}", &state.highlights)
                .replace("{experiences}", &state.experiences)
                .replace("{skills}", &state.skills)
                .replace("{project_summaries}", &state.project_summaries)
                .replace("{context}", &context_text)
        } else {
            COVER_LETTER_FROM_RESUME_PROMPT_TEMPLATE
                .replace("{position}", &state.position)
                .replace("{company}", &state.company)
                .replace("{job}", &state.job_posting)
                .replace("{resume}", &state.resume_text)
                .replace("{context}", &context_text)
        };

        let response = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| AppError::Llm(format!("Cover letter generation failed: {e}")))?;

        let extracted = extract::cover_letter_body(&response);
        state.note_issues(self.name(), &extracted.issues);
        state.note("cover_letter_chars", extracted.content.len());
        info!("Generated cover letter ({} chars)", extracted.content.len());

        state.cover_letter = extracted.content;
        Ok(())
    }
}
