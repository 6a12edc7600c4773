use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use tracing::info;

use crate::catalog::CatalogSource;
use crate::errors::AppError;
use crate::extract;
use crate::llm_client::TextGenerator;
use crate::pipeline::prompts::EXPERIENCE_PROMPT_TEMPLATE;
use crate::pipeline::{PipelineServices, PipelineState, Stage};

/// Generates the tailored experience section from the experience catalog.
pub struct GenerateExperiences {
    llm: Arc<dyn TextGenerator>,
    catalog: CatalogSource,
}

impl GenerateExperiences {
    pub fn new(services: &PipelineServices) -> Self {
        Self {
            llm: services.llm.clone(),
            catalog: services.catalog.clone(),
        }
    }
}

#[async_trait]
impl Stage for GenerateExperiences {
    fn name(&self) -> &'static str {
        "generate_experiences"
    }

    async fn run(&self, state: &mut PipelineState) -> Result<(), AppError> {
        let entries = self.catalog.experiences().await?;
        let entries_json = serde_json::to_string_pretty(&entries)
            .map_err(|e| AppError::Internal(anyhow!("Failed to serialize experiences: {e}")))?;

        let prompt = EXPERIENCE_PROMPT_TEMPLATE
            .replace("{job}", &state.job_posting)
            .replace("{experiences}", &entries_json);

        let response = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| AppError::Llm(format!("Experience generation failed: {e}")))?;

        let extracted = extract::experience_entries(&response);
        state.note_issues(self.name(), &extracted.issues);
        state.note("experiences_chars", extracted.content.len());
        info!("Generated experiences ({} chars)", extracted.content.len());

        state.experiences = extracted.content;
        Ok(())
    }
}
