//! LaTeX — document templates and the typesetting collaborator.
//!
//! `Typesetter` is the narrow interface the pipeline depends on; the
//! production implementation shells out to pdflatex. A failed compilation is
//! NOT an error: the source file is always written and `pdf_file` is simply
//! `None`, which callers surface to the user as "source only".

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use crate::errors::AppError;

pub mod templates;

const AUX_EXTENSIONS: &[&str] = &[".aux", ".log", ".out", ".fdb_latexmk", ".fls"];

#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub tex_file: PathBuf,
    /// None signals a non-fatal compile failure.
    pub pdf_file: Option<PathBuf>,
}

#[async_trait]
pub trait Typesetter: Send + Sync {
    async fn compile(
        &self,
        source: &str,
        output_dir: &Path,
        filename: &str,
    ) -> Result<CompileOutput, AppError>;
}

/// Compiles LaTeX source with pdflatex. Two passes for stable references,
/// auxiliary files removed afterwards.
pub struct PdflatexCompiler;

#[async_trait]
impl Typesetter for PdflatexCompiler {
    async fn compile(
        &self,
        source: &str,
        output_dir: &Path,
        filename: &str,
    ) -> Result<CompileOutput, AppError> {
        tokio::fs::create_dir_all(output_dir).await?;

        let tex_file = output_dir.join(filename);
        tokio::fs::write(&tex_file, source).await?;

        let mut failed = false;
        for pass in 1..=2 {
            let result = Command::new("pdflatex")
                .arg("-interaction=nonstopmode")
                .arg(filename)
                .current_dir(output_dir)
                .output()
                .await;

            match result {
                Ok(output) if output.status.success() => {}
                Ok(output) => {
                    warn!(
                        "pdflatex pass {pass} failed for {}: {}",
                        tex_file.display(),
                        tail(&String::from_utf8_lossy(&output.stdout))
                    );
                    failed = true;
                    break;
                }
                Err(e) => {
                    warn!("pdflatex unavailable: {e}");
                    failed = true;
                    break;
                }
            }
        }

        let base = filename.strip_suffix(".tex").unwrap_or(filename);
        for ext in AUX_EXTENSIONS {
            let _ = tokio::fs::remove_file(output_dir.join(format!("{base}{ext}"))).await;
        }

        let pdf_path = output_dir.join(format!("{base}.pdf"));
        let pdf_file = if !failed && tokio::fs::metadata(&pdf_path).await.is_ok() {
            info!("Compiled {}", pdf_path.display());
            Some(pdf_path)
        } else {
            None
        };

        Ok(CompileOutput { tex_file, pdf_file })
    }
}

/// Last lines of a pdflatex log, enough to see the actual error.
fn tail(log: &str) -> String {
    let lines: Vec<&str> = log.lines().collect();
    let start = lines.len().saturating_sub(12);
    lines[start..].join("\n")
}

/// Makes a company or position name safe to use as a directory or file name.
/// Concurrent runs are namespaced by these components, so they must never
/// escape the output root or collide through path separators.
pub fn sanitize_component(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            _ => c,
        })
        .collect();

    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_passes_plain_names() {
        assert_eq!(sanitize_component("Acme Corp"), "Acme Corp");
    }

    #[test]
    fn test_sanitize_replaces_path_separators() {
        assert_eq!(
            sanitize_component("Platform/Infra: Senior"),
            "Platform-Infra- Senior"
        );
        assert_eq!(sanitize_component("a\\b"), "a-b");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_component("   "), "untitled");
    }

    #[tokio::test]
    async fn test_compile_writes_source_even_without_pdflatex() {
        let dir = tempfile::tempdir().unwrap();
        let output = PdflatexCompiler
            .compile("\\documentclass{article}\\begin{document}hi\\end{document}",
                dir.path(),
                "sample.tex",
            )
            .await
            .unwrap();

        assert!(output.tex_file.is_file());
        let written = tokio::fs::read_to_string(&output.tex_file).await.unwrap();
        assert!(written.contains("\\documentclass"));
        // pdf_file is None on machines without a LaTeX toolchain — either
        // outcome is a success as far as the pipeline is concerned.
    }
}
