//! Retrieval — the document-store collaborator behind cover-letter context.
//!
//! `ContextStore` is the narrow interface pipeline stages depend on. The
//! production implementation is a Chroma HTTP store with client-side OpenAI
//! embeddings; tests substitute a canned store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;

pub mod chroma;
pub mod embeddings;

pub use chroma::ChromaStore;
pub use embeddings::EmbeddingClient;

/// One retrieved (or to-be-indexed) document: content plus opaque metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextDocument {
    pub content: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, Value>,
}

impl ContextDocument {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: serde_json::Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata
            .insert(key.to_string(), Value::String(value.into()));
        self
    }
}

#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Similarity search; returns the top-k matches, best first.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<ContextDocument>, AppError>;

    /// Chunks, embeds, and indexes documents for future searches.
    async fn add(&self, documents: Vec<ContextDocument>) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_metadata_builder() {
        let doc = ContextDocument::new("body")
            .with_metadata("source", "cover letter")
            .with_metadata("company", "Acme");
        assert_eq!(doc.metadata["source"], "cover letter");
        assert_eq!(doc.metadata["company"], "Acme");
    }

    #[test]
    fn test_document_deserializes_without_metadata() {
        let doc: ContextDocument = serde_json::from_str(r#"{"content": "text"}"#).unwrap();
        assert!(doc.metadata.is_empty());
    }
}
