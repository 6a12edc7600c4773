use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::catalog::CatalogSource;
use crate::errors::AppError;
use crate::latex::templates::{render_cover_letter, render_resume};
use crate::latex::{sanitize_component, Typesetter};
use crate::pipeline::{PipelineServices, PipelineState, Stage};

/// Renders the résumé source and hands it to the typesetter.
///
/// A typesetting failure is absorbed here: the source file is always written
/// and `resume_pdf_file` stays `None`. Later stages (context retrieval, cover
/// letter) depend on the generated sections, not on the PDF.
pub struct CompileResume {
    typesetter: Arc<dyn Typesetter>,
    catalog: CatalogSource,
    resumes_dir: PathBuf,
}

impl CompileResume {
    pub fn new(services: &PipelineServices) -> Self {
        Self {
            typesetter: services.typesetter.clone(),
            catalog: services.catalog.clone(),
            resumes_dir: services.output.resumes_dir.clone(),
        }
    }
}

#[async_trait]
impl Stage for CompileResume {
    fn name(&self) -> &'static str {
        "compile_resume"
    }

    async fn run(&self, state: &mut PipelineState) -> Result<(), AppError> {
        let profile = self.catalog.profile().await?;
        let source = render_resume(
            &profile,
            &state.highlights,
            &state.experiences,
            &state.skills,
            &state.project_summaries,
        );

        let output_dir = self.resumes_dir.join(sanitize_component(&state.company));
        let filename = format!("{}.tex", sanitize_component(&state.position));

        let output = self.typesetter.compile(&source, &output_dir, &filename).await?;
        if output.pdf_file.is_none() {
            warn!(
                "Resume PDF compilation failed; source kept at {}",
                output.tex_file.display()
            );
        } else {
            info!("Resume compiled to {}", output_dir.display());
        }

        state.resume_source = source;
        state.resume_tex_file = Some(output.tex_file);
        state.resume_pdf_file = output.pdf_file;
        Ok(())
    }
}

/// Renders the cover-letter source around the generated body and compiles it.
pub struct CompileCoverLetter {
    typesetter: Arc<dyn Typesetter>,
    catalog: CatalogSource,
    cover_letters_dir: PathBuf,
}

impl CompileCoverLetter {
    pub fn new(services: &PipelineServices) -> Self {
        Self {
            typesetter: services.typesetter.clone(),
            catalog: services.catalog.clone(),
            cover_letters_dir: services.output.cover_letters_dir.clone(),
        }
    }
}

#[async_trait]
impl Stage for CompileCoverLetter {
    fn name(&self) -> &'static str {
        "compile_cover_letter"
    }

    async fn run(&self, state: &mut PipelineState) -> Result<(), AppError> {
        let profile = self.catalog.profile().await?;
        let source = render_cover_letter(&profile, &state.position, &state.company, &state.cover_letter);

        let output_dir = self
            .cover_letters_dir
            .join(sanitize_component(&state.company));
        let filename = format!("{}.tex", sanitize_component(&state.position));

        let output = self.typesetter.compile(&source, &output_dir, &filename).await?;
        if output.pdf_file.is_none() {
            warn!(
                "Cover letter PDF compilation failed; source kept at {}",
                output.tex_file.display()
            );
        } else {
            info!("Cover letter compiled to {}", output_dir.display());
        }

        state.cover_letter_source = source;
        state.cover_letter_tex_file = Some(output.tex_file);
        state.cover_letter_pdf_file = output.pdf_file;
        Ok(())
    }
}
