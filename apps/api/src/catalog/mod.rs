//! Catalog — static, read-only reference data consulted by pipeline stages.
//!
//! Experience, skill, and project records live as JSON files under the data
//! directory and are re-read on every stage invocation. The catalog is small
//! and reloading keeps edits visible without a restart.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

const EXPERIENCES_FILE: &str = "experiences.json";
const SKILLS_FILE: &str = "technical_skills.json";
const PROJECTS_FILE: &str = "projects.json";
const PROFILE_FILE: &str = "profile.json";

// ────────────────────────────────────────────────────────────────────────────
// Catalog records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub organization: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    /// Self-assessed expertise, 1–10. Rendered into prompts, never into documents.
    pub expertise: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCategory {
    pub category: String,
    pub skills: Vec<SkillEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub title: String,
    pub description: String,
    pub stack: Vec<String>,
    /// Path to long-form documentation, relative to the data directory.
    #[serde(default)]
    pub readme: Option<String>,
    pub github: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub dates: String,
    pub location: String,
    #[serde(default)]
    pub details: Vec<String>,
}

/// Candidate identity rendered into document headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address_lines: Vec<String>,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
}

#[derive(Debug, Deserialize)]
struct ExperiencesFile {
    experiences: Vec<ExperienceEntry>,
}

#[derive(Debug, Deserialize)]
struct SkillsFile {
    categories: Vec<SkillCategory>,
}

#[derive(Debug, Deserialize)]
struct ProjectsFile {
    projects: Vec<ProjectEntry>,
}

// ────────────────────────────────────────────────────────────────────────────
// Loader
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CatalogSource {
    data_dir: PathBuf,
}

impl CatalogSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub async fn experiences(&self) -> Result<Vec<ExperienceEntry>, AppError> {
        let file: ExperiencesFile = self.load(EXPERIENCES_FILE).await?;
        Ok(file.experiences)
    }

    pub async fn skill_categories(&self) -> Result<Vec<SkillCategory>, AppError> {
        let file: SkillsFile = self.load(SKILLS_FILE).await?;
        Ok(file.categories)
    }

    pub async fn projects(&self) -> Result<Vec<ProjectEntry>, AppError> {
        let file: ProjectsFile = self.load(PROJECTS_FILE).await?;
        Ok(file.projects)
    }

    pub async fn profile(&self) -> Result<Profile, AppError> {
        self.load(PROFILE_FILE).await
    }

    /// Reads a project's long-form documentation. A missing or unreadable
    /// readme is tolerated — the summary prompt simply goes without it.
    pub async fn project_readme(&self, entry: &ProjectEntry) -> Option<String> {
        let relative = entry.readme.as_deref()?;
        let path = self.data_dir.join(relative);
        match tokio::fs::read_to_string(&path).await {
            Ok(docs) => Some(docs),
            Err(e) => {
                tracing::warn!(
                    "Readme for project '{}' unreadable at {}: {e}",
                    entry.title,
                    path.display()
                );
                None
            }
        }
    }

    async fn load<T: DeserializeOwned>(&self, file: &str) -> Result<T, AppError> {
        let path = self.data_dir.join(file);
        let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
            AppError::NotFound(format!("Catalog file {} unreadable: {e}", path.display()))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| AppError::Validation(format!("Catalog file {file} is malformed: {e}")))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Title validation
// ────────────────────────────────────────────────────────────────────────────

/// Validates selected project titles against the catalog.
///
/// Exact title match wins. A case-insensitive containment match (either
/// direction) repairs near-miss titles the generation call occasionally
/// produces. Anything else is dropped and reported, never raised.
pub fn validate_project_names(
    selected: &[String],
    projects: &[ProjectEntry],
) -> (Vec<String>, Vec<String>) {
    let mut valid = Vec::new();
    let mut missing = Vec::new();

    for name in selected {
        if projects.iter().any(|p| p.title == *name) {
            valid.push(name.clone());
            continue;
        }

        let needle = name.to_lowercase();
        match projects.iter().find(|p| {
            let title = p.title.to_lowercase();
            title.contains(&needle) || needle.contains(&title)
        }) {
            Some(repaired) => valid.push(repaired.title.clone()),
            None => missing.push(name.clone()),
        }
    }

    (valid, missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(title: &str) -> ProjectEntry {
        ProjectEntry {
            title: title.to_string(),
            description: "A project".to_string(),
            stack: vec!["Rust".to_string()],
            readme: None,
            github: "https://github.com/example/example".to_string(),
        }
    }

    #[test]
    fn test_exact_titles_pass_through() {
        let catalog = vec![project("Distributed Cache"), project("Chat Server")];
        let selected = vec!["Chat Server".to_string(), "Distributed Cache".to_string()];
        let (valid, missing) = validate_project_names(&selected, &catalog);
        assert_eq!(valid, vec!["Chat Server", "Distributed Cache"]);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_near_miss_repaired_to_catalog_title() {
        let catalog = vec![project("Distributed Cache")];
        let selected = vec!["distributed cache".to_string()];
        let (valid, missing) = validate_project_names(&selected, &catalog);
        assert_eq!(valid, vec!["Distributed Cache"]);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_partial_title_repaired_by_containment() {
        let catalog = vec![project("Raft Consensus Implementation")];
        let selected = vec!["Raft Consensus".to_string()];
        let (valid, _) = validate_project_names(&selected, &catalog);
        assert_eq!(valid, vec!["Raft Consensus Implementation"]);
    }

    #[test]
    fn test_unknown_title_dropped_with_report() {
        let catalog = vec![project("Chat Server")];
        let selected = vec!["Chat Server".to_string(), "Quantum Compiler".to_string()];
        let (valid, missing) = validate_project_names(&selected, &catalog);
        assert_eq!(valid, vec!["Chat Server"]);
        assert_eq!(missing, vec!["Quantum Compiler"]);
    }

    #[test]
    fn test_empty_selection_is_not_an_error() {
        let catalog = vec![project("Chat Server")];
        let (valid, missing) = validate_project_names(&[], &catalog);
        assert!(valid.is_empty());
        assert!(missing.is_empty());
    }

    #[test]
    fn test_profile_deserializes_without_education() {
        let raw = r#"{
            "name": "Jordan Doe",
            "email": "jordan@example.com",
            "phone": "555-0100",
            "address_lines": ["1 Main St", "Springfield"],
            "linkedin": "jordandoe",
            "github": "jordandoe",
            "portfolio": "https://jordandoe.dev"
        }"#;
        let profile: Profile = serde_json::from_str(raw).unwrap();
        assert!(profile.education.is_empty());
    }
}
