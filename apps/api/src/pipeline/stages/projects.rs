use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::catalog::{validate_project_names, CatalogSource};
use crate::errors::AppError;
use crate::extract;
use crate::llm_client::TextGenerator;
use crate::pipeline::prompts::{PROJECT_SELECTION_PROMPT_TEMPLATE, PROJECT_SUMMARY_PROMPT_TEMPLATE};
use crate::pipeline::stages::excerpt;
use crate::pipeline::{PipelineServices, PipelineState, Stage};

/// Readme documentation is truncated to this many characters before prompting.
const README_CHAR_LIMIT: usize = 3000;

// ────────────────────────────────────────────────────────────────────────────
// Project selection
// ────────────────────────────────────────────────────────────────────────────

/// Ranks catalog projects against the posting and keeps the titles that
/// survive catalog validation. An empty selection is tolerated — the résumé
/// simply gets an empty projects section.
pub struct SelectProjects {
    llm: Arc<dyn TextGenerator>,
    catalog: CatalogSource,
}

impl SelectProjects {
    pub fn new(services: &PipelineServices) -> Self {
        Self {
            llm: services.llm.clone(),
            catalog: services.catalog.clone(),
        }
    }
}

#[async_trait]
impl Stage for SelectProjects {
    fn name(&self) -> &'static str {
        "select_projects"
    }

    async fn run(&self, state: &mut PipelineState) -> Result<(), AppError> {
        let projects = self.catalog.projects().await?;
        let projects_json = serde_json::to_string_pretty(&projects)
            .map_err(|e| AppError::Internal(anyhow!("Failed to serialize projects: {e}")))?;

        let prompt = PROJECT_SELECTION_PROMPT_TEMPLATE
            .replace("{job}", &state.job_posting)
            .replace("{projects}", &projects_json);

        let response = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| AppError::Llm(format!("Project selection failed: {e}")))?;

        let extracted = extract::project_name_list(&response);
        state.note_issues(self.name(), &extracted.issues);

        let (valid, missing) = validate_project_names(&extracted.names, &projects);
        for name in &missing {
            warn!("Selected project '{name}' not in catalog, dropping");
        }
        if !missing.is_empty() {
            state.note(
                "dropped_project_names",
                Value::Array(missing.into_iter().map(Value::String).collect()),
            );
        }

        info!("Selected {} projects", valid.len());
        state.note("projects_selected", valid.len());
        state.project_names = valid;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Project summaries
// ────────────────────────────────────────────────────────────────────────────

/// One generate-then-extract cycle per selected project, in selection order.
/// A title that no longer resolves in the catalog is skipped, not an error.
pub struct SummarizeProjects {
    llm: Arc<dyn TextGenerator>,
    catalog: CatalogSource,
}

impl SummarizeProjects {
    pub fn new(services: &PipelineServices) -> Self {
        Self {
            llm: services.llm.clone(),
            catalog: services.catalog.clone(),
        }
    }
}

#[async_trait]
impl Stage for SummarizeProjects {
    fn name(&self) -> &'static str {
        "summarize_projects"
    }

    async fn run(&self, state: &mut PipelineState) -> Result<(), AppError> {
        let projects = self.catalog.projects().await?;
        let mut summaries: Vec<String> = Vec::new();
        let mut skipped: Vec<Value> = Vec::new();

        let names = state.project_names.clone();
        for name in &names {
            let Some(entry) = projects.iter().find(|p| p.title == *name) else {
                warn!("Project '{name}' missing from catalog, skipping summary");
                skipped.push(Value::String(name.clone()));
                continue;
            };

            let docs = self.catalog.project_readme(entry).await.unwrap_or_default();

            let prompt = PROJECT_SUMMARY_PROMPT_TEMPLATE
                .replace("{job}", &state.job_posting)
                .replace("{project_title}", &entry.title)
                .replace("{project_description}", &entry.description)
                .replace("{project_stack}", &entry.stack.join(", "))
                .replace("{project_docs}", excerpt(&docs, README_CHAR_LIMIT))
                .replace("{github}", &entry.github);

            let response = self.llm.complete(&prompt).await.map_err(|e| {
                AppError::Llm(format!("Summary generation for '{name}' failed: {e}"))
            })?;

            let extracted = extract::project_entries(&response);
            state.note_issues(self.name(), &extracted.issues);
            summaries.push(extracted.content);
        }

        if !skipped.is_empty() {
            state.note("skipped_project_summaries", Value::Array(skipped));
        }

        info!(
            "Summarized {} of {} selected projects",
            summaries.len(),
            names.len()
        );
        state.project_summaries = summaries.join("\n\n");
        state.note("project_summaries_chars", state.project_summaries.len());
        Ok(())
    }
}
