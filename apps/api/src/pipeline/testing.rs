//! Stub collaborators and catalog fixtures shared by pipeline and
//! orchestrator tests.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::catalog::CatalogSource;
use crate::errors::AppError;
use crate::latex::{CompileOutput, Typesetter};
use crate::llm_client::{LlmError, TextGenerator};
use crate::pipeline::{OutputPaths, PipelineServices};
use crate::retrieval::{ContextDocument, ContextStore};

pub const EXPERIENCE_RESPONSE: &str = "Here are the entries:\n\n```latex\n\\resumeSubheading\n{Acme Corp}{Jan 2020 -- Dec 2022}\n{Software Engineer}{Toronto, ON}\n\\resumeItemListStart\n\\resumeItem{Built a billing service in \\textbf{Rust}}\n\\resumeItemListEnd\n```";

pub const SKILLS_RESPONSE: &str = "\\begin{itemize}[leftmargin=0.15in, label={}]\n\\small{\\item{\n\\textbf{Languages}{: Rust, Python, SQL} \\\\\n\\textbf{Cloud}{: AWS, Docker}\n}}\n\\end{itemize}";

pub const PROJECT_SUMMARY_RESPONSE: &str = "\\resumeProjectHeading\n{Distributed Cache $|$ Rust, Tokio}{}\n\\resumeItemListStart\n\\resumeItem{Implemented a sharded cache in \\textbf{Rust}}\n\\resumeItem{Benchmarked at 1M ops/sec}\n\\resumeItem{Deployed behind \\textbf{Tokio}}\n\\resumeItemListEnd";

pub const HIGHLIGHTS_RESPONSE: &str = "\\resumeItem{\\textbf{Systems:} Production \\textbf{Rust} services at scale}\n\\resumeItem{\\textbf{Cloud:} Shipped on \\textbf{AWS} with observability}";

pub const COVER_LETTER_RESPONSE: &str = "Here is the cover letter:\n\nI am excited to apply for this role. My experience building production Rust services maps directly onto the challenges your team describes, from performance-sensitive request paths to operational reliability.\n\nAt Acme Corp I built and ran a billing service that processed real money with real consequences, which taught me to value correctness and observability in equal measure.\n\nI would welcome the chance to bring that experience to your team.";

/// Canned generator keyed on prompt markers, one response per stage kind.
pub struct ScriptedGenerator {
    pub selection_response: String,
}

impl Default for ScriptedGenerator {
    fn default() -> Self {
        Self {
            selection_response: r#"["Distributed Cache", "Chat Server"]"#.to_string(),
        }
    }
}

impl ScriptedGenerator {
    pub fn selecting(selection_response: &str) -> Self {
        Self {
            selection_response: selection_response.to_string(),
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if prompt.contains("tailoring professional experiences") {
            Ok(EXPERIENCE_RESPONSE.to_string())
        } else if prompt.contains("tailoring technical skills") {
            Ok(SKILLS_RESPONSE.to_string())
        } else if prompt.contains("project selection") {
            Ok(self.selection_response.clone())
        } else if prompt.contains("compelling project descriptions") {
            Ok(PROJECT_SUMMARY_RESPONSE.to_string())
        } else if prompt.contains("Highlight of Qualifications") {
            Ok(HIGHLIGHTS_RESPONSE.to_string())
        } else if prompt.contains("cover letter body") {
            Ok(COVER_LETTER_RESPONSE.to_string())
        } else {
            Err(LlmError::EmptyContent)
        }
    }
}

/// Delegates to `ScriptedGenerator` but errors on prompts containing the
/// given marker — for exercising the short-circuit path.
pub struct FailingGenerator {
    pub fail_marker: &'static str,
    inner: ScriptedGenerator,
}

impl FailingGenerator {
    pub fn failing_on(fail_marker: &'static str) -> Self {
        Self {
            fail_marker,
            inner: ScriptedGenerator::default(),
        }
    }
}

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if prompt.contains(self.fail_marker) {
            return Err(LlmError::Api {
                status: 500,
                message: "stubbed generation failure".to_string(),
            });
        }
        self.inner.complete(prompt).await
    }
}

/// Writes the tex source for real; optionally pretends pdflatex failed.
pub struct StubTypesetter {
    pub fail_pdf: bool,
}

#[async_trait]
impl Typesetter for StubTypesetter {
    async fn compile(
        &self,
        source: &str,
        output_dir: &Path,
        filename: &str,
    ) -> Result<CompileOutput, AppError> {
        tokio::fs::create_dir_all(output_dir).await?;
        let tex_file = output_dir.join(filename);
        tokio::fs::write(&tex_file, source).await?;

        let pdf_file = if self.fail_pdf {
            None
        } else {
            let base = filename.strip_suffix(".tex").unwrap_or(filename);
            let pdf = output_dir.join(format!("{base}.pdf"));
            tokio::fs::write(&pdf, b"%PDF-1.4 stub").await?;
            Some(pdf)
        };

        Ok(CompileOutput { tex_file, pdf_file })
    }
}

/// Returns one canned document on search and records everything added.
#[derive(Default)]
pub struct RecordingStore {
    pub added: Mutex<Vec<ContextDocument>>,
}

#[async_trait]
impl ContextStore for RecordingStore {
    async fn search(&self, _query: &str, _k: usize) -> Result<Vec<ContextDocument>, AppError> {
        Ok(vec![ContextDocument::new(
            "A previous cover letter about building Rust services.",
        )
        .with_metadata("source", "cover letter")])
    }

    async fn add(&self, documents: Vec<ContextDocument>) -> Result<(), AppError> {
        self.added.lock().unwrap().extend(documents);
        Ok(())
    }
}

/// Writes a minimal catalog into `dir`.
pub async fn write_catalog(dir: &Path) {
    tokio::fs::write(
        dir.join("experiences.json"),
        r#"{
  "experiences": [
    {
      "organization": "Acme Corp",
      "role": "Software Engineer",
      "start_date": "Jan 2020",
      "end_date": "Dec 2022",
      "location": "Toronto, ON",
      "achievements": ["Built a billing service in Rust"]
    }
  ]
}"#,
    )
    .await
    .unwrap();

    tokio::fs::write(
        dir.join("technical_skills.json"),
        r#"{
  "categories": [
    {
      "category": "Languages",
      "skills": [
        { "name": "Rust", "expertise": 9 },
        { "name": "Python", "expertise": 7 }
      ]
    }
  ]
}"#,
    )
    .await
    .unwrap();

    tokio::fs::write(
        dir.join("projects.json"),
        r#"{
  "projects": [
    {
      "title": "Distributed Cache",
      "description": "A sharded in-memory cache",
      "stack": ["Rust", "Tokio"],
      "github": "https://github.com/example/cache"
    },
    {
      "title": "Chat Server",
      "description": "A websocket chat backend",
      "stack": ["Rust", "Axum"],
      "github": "https://github.com/example/chat"
    }
  ]
}"#,
    )
    .await
    .unwrap();

    tokio::fs::write(
        dir.join("profile.json"),
        r#"{
  "name": "Jordan Doe",
  "email": "jordan@example.com",
  "phone": "555-0100",
  "address_lines": ["1 Main St", "Springfield"],
  "linkedin": "jordandoe",
  "github": "jordandoe",
  "portfolio": "https://jordandoe.dev"
}"#,
    )
    .await
    .unwrap();
}

/// Builds a full `PipelineServices` over stubs, with the catalog written
/// into `catalog_dir` and artifacts rooted at `output_dir`.
pub async fn stub_services(
    catalog_dir: &Path,
    output_dir: &Path,
    llm: Arc<dyn TextGenerator>,
    fail_pdf: bool,
) -> (PipelineServices, Arc<RecordingStore>) {
    write_catalog(catalog_dir).await;
    let store = Arc::new(RecordingStore::default());

    let services = PipelineServices {
        llm,
        store: store.clone(),
        typesetter: Arc::new(StubTypesetter { fail_pdf }),
        catalog: CatalogSource::new(catalog_dir),
        output: OutputPaths {
            resumes_dir: output_dir.join("resumes"),
            cover_letters_dir: output_dir.join("cover_letters"),
        },
        num_context_docs: 4,
    };

    (services, store)
}
