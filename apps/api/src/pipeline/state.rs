//! Pipeline state — the single mutable record threaded through a workflow run.
//!
//! Fields are grouped by lifecycle: inputs are set once at construction and
//! never mutated; stage-produced fields are written by exactly one stage and
//! read by later ones; the workflow's fixed ordering is what guarantees a
//! field is populated before its consumers run. Every run owns a fresh
//! instance — state is never shared or reused across runs.

use std::path::PathBuf;

use serde_json::{Map, Value};
use tracing::warn;

use crate::extract::ExtractIssue;
use crate::retrieval::ContextDocument;

#[derive(Debug, Default)]
pub struct PipelineState {
    // Input — set at construction
    pub job_posting: String,
    pub company: String,
    pub position: String,
    /// Cover-letter-only mode: the existing résumé artifact to draw from.
    pub resume_pdf: Option<PathBuf>,

    // Stage-produced
    pub experiences: String,
    pub skills: String,
    pub project_names: Vec<String>,
    pub project_summaries: String,
    pub highlights: String,
    pub cover_letter: String,
    /// Extracted text of the loaded résumé (cover-letter-only mode).
    pub resume_text: String,

    // Derived artifacts — a populated tex file with a None pdf means the
    // typesetting toolchain failed, which is not a pipeline error.
    pub resume_source: String,
    pub resume_tex_file: Option<PathBuf>,
    pub resume_pdf_file: Option<PathBuf>,
    pub cover_letter_source: String,
    pub cover_letter_tex_file: Option<PathBuf>,
    pub cover_letter_pdf_file: Option<PathBuf>,

    // Side channels
    pub context: Vec<ContextDocument>,
    pub metadata: Map<String, Value>,
}

impl PipelineState {
    pub fn for_resume(
        job_posting: impl Into<String>,
        company: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        Self {
            job_posting: job_posting.into(),
            company: company.into(),
            position: position.into(),
            ..Default::default()
        }
    }

    pub fn for_cover_letter(
        job_posting: impl Into<String>,
        company: impl Into<String>,
        position: impl Into<String>,
        resume_pdf: PathBuf,
    ) -> Self {
        Self {
            job_posting: job_posting.into(),
            company: company.into(),
            position: position.into(),
            resume_pdf: Some(resume_pdf),
            ..Default::default()
        }
    }

    /// Records a diagnostic value in the metadata side channel.
    pub fn note(&mut self, key: &str, value: impl Into<Value>) {
        self.metadata.insert(key.to_string(), value.into());
    }

    /// Logs and records non-fatal extraction issues observed by a stage.
    pub fn note_issues(&mut self, stage: &str, issues: &[ExtractIssue]) {
        if issues.is_empty() {
            return;
        }
        for issue in issues {
            warn!("Stage '{stage}': {issue}");
        }
        let rendered: Vec<Value> = issues
            .iter()
            .map(|i| Value::String(i.to_string()))
            .collect();
        let entry = self
            .metadata
            .entry(format!("{stage}_issues"))
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(existing) = entry {
            existing.extend(rendered);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_has_empty_outputs() {
        let state = PipelineState::for_resume("posting", "Acme", "Engineer");
        assert_eq!(state.company, "Acme");
        assert!(state.experiences.is_empty());
        assert!(state.resume_pdf_file.is_none());
        assert!(state.context.is_empty());
        assert!(state.metadata.is_empty());
    }

    #[test]
    fn test_note_issues_accumulates_across_calls() {
        let mut state = PipelineState::for_resume("posting", "Acme", "Engineer");
        state.note_issues(
            "summarize_projects",
            &[ExtractIssue::FallbackUsed { kind: "projects" }],
        );
        state.note_issues(
            "summarize_projects",
            &[ExtractIssue::RawPassthrough { kind: "projects" }],
        );
        let issues = state.metadata["summarize_projects_issues"].as_array().unwrap();
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_note_issues_skips_empty() {
        let mut state = PipelineState::for_resume("posting", "Acme", "Engineer");
        state.note_issues("generate_skills", &[]);
        assert!(state.metadata.is_empty());
    }
}
