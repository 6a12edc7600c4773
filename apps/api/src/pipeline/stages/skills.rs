use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use tracing::info;

use crate::catalog::CatalogSource;
use crate::errors::AppError;
use crate::extract;
use crate::llm_client::TextGenerator;
use crate::pipeline::prompts::SKILLS_PROMPT_TEMPLATE;
use crate::pipeline::{PipelineServices, PipelineState, Stage};

/// Prunes the skill catalog down to a job-relevant technical skills section.
pub struct GenerateSkills {
    llm: Arc<dyn TextGenerator>,
    catalog: CatalogSource,
}

impl GenerateSkills {
    pub fn new(services: &PipelineServices) -> Self {
        Self {
            llm: services.llm.clone(),
            catalog: services.catalog.clone(),
        }
    }
}

#[async_trait]
impl Stage for GenerateSkills {
    fn name(&self) -> &'static str {
        "generate_skills"
    }

    async fn run(&self, state: &mut PipelineState) -> Result<(), AppError> {
        let categories = self.catalog.skill_categories().await?;
        let skills_json = serde_json::to_string_pretty(&categories)
            .map_err(|e| AppError::Internal(anyhow!("Failed to serialize skills: {e}")))?;

        let prompt = SKILLS_PROMPT_TEMPLATE
            .replace("{job}", &state.job_posting)
            .replace("{skills}", &skills_json);

        let response = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| AppError::Llm(format!("Skills generation failed: {e}")))?;

        let extracted = extract::skills_section(&response);
        state.note_issues(self.name(), &extracted.issues);
        state.note("skills_chars", extracted.content.len());
        info!("Generated skills section ({} chars)", extracted.content.len());

        state.skills = extracted.content;
        Ok(())
    }
}
