//! Workflow graphs — the fixed stage sequences for each generation mode.
//!
//! Execution is strictly sequential: each stage reads what earlier stages
//! wrote, so the declared order IS the dependency mechanism. The first
//! failing stage aborts the run and its identity travels with the error;
//! compile stages absorb typesetting failures and are not failure points for
//! a missing PDF.

use std::time::Instant;

use tracing::{debug, info};

use crate::errors::AppError;
use crate::pipeline::stages::{
    CompileCoverLetter, CompileResume, GenerateCoverLetter, GenerateExperiences,
    GenerateHighlights, GenerateSkills, IndexCoverLetter, LoadResume, RetrieveContext,
    SelectProjects, SummarizeProjects,
};
use crate::pipeline::{PipelineServices, PipelineState, Stage};

pub struct Workflow {
    name: &'static str,
    stages: Vec<Box<dyn Stage>>,
}

impl Workflow {
    pub fn new(name: &'static str, stages: Vec<Box<dyn Stage>>) -> Self {
        Self { name, stages }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Runs every stage in declaration order against one state instance,
    /// short-circuiting on the first unrecovered error.
    pub async fn run(&self, state: &mut PipelineState) -> Result<(), AppError> {
        info!(
            "Workflow '{}' starting ({} stages)",
            self.name,
            self.stages.len()
        );
        debug!("Stage order: {:?}", self.stage_names());

        for stage in &self.stages {
            info!("Stage '{}' starting", stage.name());
            let started = Instant::now();

            stage
                .run(state)
                .await
                .map_err(|e| AppError::in_stage(stage.name(), e))?;

            state.note(
                &format!("{}_duration_ms", stage.name()),
                started.elapsed().as_millis() as u64,
            );
        }

        info!("Workflow '{}' completed", self.name);
        Ok(())
    }
}

/// Full generation: résumé sections, compiled résumé, then a cover letter
/// grounded in those sections. The résumé must be compiled before context
/// retrieval because the cover-letter stages read the generated sections.
pub fn resume_with_cover_letter(services: &PipelineServices) -> Workflow {
    Workflow::new(
        "resume_with_cover_letter",
        vec![
            Box::new(GenerateExperiences::new(services)),
            Box::new(GenerateSkills::new(services)),
            Box::new(SelectProjects::new(services)),
            Box::new(SummarizeProjects::new(services)),
            Box::new(GenerateHighlights::new(services)),
            Box::new(CompileResume::new(services)),
            Box::new(RetrieveContext::new(services)),
            Box::new(GenerateCoverLetter::with_resume_sections(services)),
            Box::new(CompileCoverLetter::new(services)),
            Box::new(IndexCoverLetter::new(services)),
        ],
    )
}

/// Cover letter against an existing résumé artifact.
pub fn cover_letter_only(services: &PipelineServices) -> Workflow {
    Workflow::new(
        "cover_letter_only",
        vec![
            Box::new(LoadResume),
            Box::new(RetrieveContext::new(services)),
            Box::new(GenerateCoverLetter::from_loaded_resume(services)),
            Box::new(CompileCoverLetter::new(services)),
            Box::new(IndexCoverLetter::new(services)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::pipeline::testing::{stub_services, FailingGenerator, ScriptedGenerator};

    const RESUME_STAGES: [&str; 10] = [
        "generate_experiences",
        "generate_skills",
        "select_projects",
        "summarize_projects",
        "generate_highlights",
        "compile_resume",
        "retrieve_context",
        "generate_cover_letter",
        "compile_cover_letter",
        "index_cover_letter",
    ];

    const COVER_LETTER_STAGES: [&str; 5] = [
        "load_resume",
        "retrieve_context",
        "generate_cover_letter",
        "compile_cover_letter",
        "index_cover_letter",
    ];

    #[tokio::test]
    async fn test_workflow_stage_sequences_are_fixed() {
        // Stage ordering is the only dependency mechanism — treat it as API.
        let catalog_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let (services, _) = stub_services(
            catalog_dir.path(),
            output_dir.path(),
            Arc::new(ScriptedGenerator::default()),
            false,
        )
        .await;

        assert_eq!(resume_with_cover_letter(&services).stage_names(), RESUME_STAGES);
        assert_eq!(cover_letter_only(&services).stage_names(), COVER_LETTER_STAGES);
    }

    #[tokio::test]
    async fn test_resume_workflow_completes_all_ten_stages() {
        let catalog_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let (services, store) = stub_services(
            catalog_dir.path(),
            output_dir.path(),
            Arc::new(ScriptedGenerator::default()),
            false,
        )
        .await;

        let mut state = PipelineState::for_resume("A Rust job posting", "Acme", "Engineer");
        resume_with_cover_letter(&services)
            .run(&mut state)
            .await
            .unwrap();

        // Every stage-produced field is populated
        assert!(state.experiences.contains("\\resumeSubheading"));
        assert!(state.skills.contains("\\begin{itemize}"));
        assert_eq!(state.project_names, vec!["Distributed Cache", "Chat Server"]);
        assert!(state.project_summaries.contains("\\resumeProjectHeading"));
        assert!(state.highlights.contains("\\resumeItem"));
        assert!(state.cover_letter.contains("Rust services"));

        // Artifacts exist, namespaced by company and position
        let resume_tex = state.resume_tex_file.as_ref().unwrap();
        assert!(resume_tex.is_file());
        assert!(resume_tex.to_string_lossy().contains("Acme"));
        assert!(state.resume_pdf_file.as_ref().unwrap().is_file());
        assert!(state.cover_letter_tex_file.as_ref().unwrap().is_file());
        assert!(state.cover_letter_pdf_file.is_some());

        // Every stage recorded its duration — all ten ran
        for stage in RESUME_STAGES {
            assert!(
                state.metadata.contains_key(&format!("{stage}_duration_ms")),
                "missing duration for {stage}"
            );
        }

        // The cover letter was indexed back into the store with its metadata
        let added = store.added.lock().unwrap();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].metadata["company"], "Acme");
        assert_eq!(added[0].metadata["source"], "cover letter");
    }

    #[tokio::test]
    async fn test_typesetting_failure_completes_with_null_pdfs() {
        let catalog_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let (services, _) = stub_services(
            catalog_dir.path(),
            output_dir.path(),
            Arc::new(ScriptedGenerator::default()),
            true, // typesetter reports compile failure
        )
        .await;

        let mut state = PipelineState::for_resume("A Rust job posting", "Acme", "Engineer");
        resume_with_cover_letter(&services)
            .run(&mut state)
            .await
            .unwrap();

        assert!(state.resume_tex_file.is_some());
        assert!(state.resume_pdf_file.is_none());
        assert!(state.cover_letter_tex_file.is_some());
        assert!(state.cover_letter_pdf_file.is_none());
    }

    #[tokio::test]
    async fn test_catalog_miss_yields_single_summary_block() {
        let catalog_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let (services, _) = stub_services(
            catalog_dir.path(),
            output_dir.path(),
            Arc::new(ScriptedGenerator::selecting(
                r#"["Distributed Cache", "Quantum Compiler"]"#,
            )),
            false,
        )
        .await;

        let mut state = PipelineState::for_resume("A Rust job posting", "Acme", "Engineer");
        resume_with_cover_letter(&services)
            .run(&mut state)
            .await
            .unwrap();

        assert_eq!(state.project_names, vec!["Distributed Cache"]);
        assert_eq!(
            state.project_summaries.matches("\\resumeProjectHeading").count(),
            1
        );
        let dropped = state.metadata["dropped_project_names"].as_array().unwrap();
        assert_eq!(dropped[0], "Quantum Compiler");
    }

    #[tokio::test]
    async fn test_failure_halts_run_and_names_stage() {
        let catalog_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let (services, store) = stub_services(
            catalog_dir.path(),
            output_dir.path(),
            Arc::new(FailingGenerator::failing_on("tailoring technical skills")),
            false,
        )
        .await;

        let mut state = PipelineState::for_resume("A Rust job posting", "Acme", "Engineer");
        let err = resume_with_cover_letter(&services)
            .run(&mut state)
            .await
            .unwrap_err();

        match err {
            AppError::Stage { stage, .. } => assert_eq!(stage, "generate_skills"),
            other => panic!("expected Stage error, got {other}"),
        }

        // The first stage ran; nothing after the failure did.
        assert!(!state.experiences.is_empty());
        assert!(state.project_names.is_empty());
        assert!(state.highlights.is_empty());
        assert!(state.resume_tex_file.is_none());
        assert!(store.added.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_runs_produce_disjoint_artifacts() {
        let catalog_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let (services, _) = stub_services(
            catalog_dir.path(),
            output_dir.path(),
            Arc::new(ScriptedGenerator::default()),
            false,
        )
        .await;

        let mut first = PipelineState::for_resume("A Rust job posting", "Acme", "Engineer");
        let mut second = PipelineState::for_resume("A data job posting", "Globex", "Analyst");

        let workflow_a = resume_with_cover_letter(&services);
        let workflow_b = resume_with_cover_letter(&services);
        let (a, b) = tokio::join!(workflow_a.run(&mut first), workflow_b.run(&mut second));
        a.unwrap();
        b.unwrap();

        let path_a = first.resume_tex_file.unwrap();
        let path_b = second.resume_tex_file.unwrap();
        assert_ne!(path_a, path_b);
        assert!(path_a.to_string_lossy().contains("Acme"));
        assert!(path_b.to_string_lossy().contains("Globex"));

        // States never leak into each other
        assert_eq!(first.company, "Acme");
        assert_eq!(second.company, "Globex");
    }

    #[tokio::test]
    async fn test_cover_letter_workflow_fails_on_unreadable_resume() {
        let catalog_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let (services, _) = stub_services(
            catalog_dir.path(),
            output_dir.path(),
            Arc::new(ScriptedGenerator::default()),
            false,
        )
        .await;

        let mut state = PipelineState::for_cover_letter(
            "A Rust job posting",
            "Acme",
            "Engineer",
            "/nonexistent/resume.pdf".into(),
        );
        let err = cover_letter_only(&services).run(&mut state).await.unwrap_err();

        match err {
            AppError::Stage { stage, .. } => assert_eq!(stage, "load_resume"),
            other => panic!("expected Stage error, got {other}"),
        }
    }
}
