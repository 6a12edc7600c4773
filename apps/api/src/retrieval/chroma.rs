//! Chroma vector store over its HTTP API.
//!
//! Documents are chunked with text-splitter, embedded client-side, and pushed
//! with per-chunk UUIDs. The collection is resolved (get-or-create) once at
//! startup so request paths never race on collection creation.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use text_splitter::{ChunkConfig, TextSplitter};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::retrieval::{ContextDocument, ContextStore, EmbeddingClient};

#[derive(Debug, Deserialize)]
struct CollectionResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    documents: Vec<Vec<String>>,
    metadatas: Vec<Vec<Option<serde_json::Map<String, Value>>>>,
}

pub struct ChromaStore {
    client: reqwest::Client,
    base_url: String,
    collection_id: String,
    embedder: EmbeddingClient,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl ChromaStore {
    /// Resolves the named collection, creating it if absent.
    pub async fn connect(
        base_url: &str,
        collection_name: &str,
        embedder: EmbeddingClient,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::new();
        let base_url = base_url.trim_end_matches('/').to_string();

        let response = client
            .post(format!("{base_url}/api/v1/collections"))
            .json(&json!({ "name": collection_name, "get_or_create": true }))
            .send()
            .await
            .map_err(|e| AppError::Retrieval(format!("Chroma unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Retrieval(format!(
                "Chroma collection setup returned {status}: {body}"
            )));
        }

        let collection: CollectionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Retrieval(format!("Chroma response malformed: {e}")))?;

        info!(
            "Chroma collection '{collection_name}' ready (id {})",
            collection.id
        );

        Ok(Self {
            client,
            base_url,
            collection_id: collection.id,
            embedder,
            chunk_size,
            chunk_overlap,
        })
    }

    fn chunk(&self, text: &str) -> Vec<String> {
        let config = ChunkConfig::new(self.chunk_size)
            .with_overlap(self.chunk_overlap)
            .expect("overlap smaller than chunk size");
        TextSplitter::new(config)
            .chunks(text)
            .map(String::from)
            .collect()
    }

    fn collection_url(&self, action: &str) -> String {
        format!(
            "{}/api/v1/collections/{}/{action}",
            self.base_url, self.collection_id
        )
    }
}

#[async_trait]
impl ContextStore for ChromaStore {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<ContextDocument>, AppError> {
        let embedding = self.embedder.embed(query).await?;

        let response = self
            .client
            .post(self.collection_url("query"))
            .json(&json!({
                "query_embeddings": [embedding],
                "n_results": k,
                "include": ["documents", "metadatas"],
            }))
            .send()
            .await
            .map_err(|e| AppError::Retrieval(format!("Chroma query failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Retrieval(format!(
                "Chroma query returned {status}: {body}"
            )));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| AppError::Retrieval(format!("Chroma query response malformed: {e}")))?;

        let documents = parsed.documents.into_iter().next().unwrap_or_default();
        let metadatas = parsed.metadatas.into_iter().next().unwrap_or_default();

        let results: Vec<ContextDocument> = documents
            .into_iter()
            .zip(metadatas.into_iter().chain(std::iter::repeat(None)))
            .map(|(content, metadata)| ContextDocument {
                content,
                metadata: metadata.unwrap_or_default(),
            })
            .collect();

        debug!("Chroma returned {} documents for query", results.len());
        Ok(results)
    }

    async fn add(&self, documents: Vec<ContextDocument>) -> Result<(), AppError> {
        let mut ids: Vec<String> = Vec::new();
        let mut chunks: Vec<String> = Vec::new();
        let mut metadatas: Vec<serde_json::Map<String, Value>> = Vec::new();

        for document in &documents {
            for chunk in self.chunk(&document.content) {
                ids.push(Uuid::new_v4().to_string());
                chunks.push(chunk);
                metadatas.push(document.metadata.clone());
            }
        }

        if chunks.is_empty() {
            return Ok(());
        }

        let chunk_refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
        let embeddings = self.embedder.embed_batch(&chunk_refs).await?;

        let response = self
            .client
            .post(self.collection_url("add"))
            .json(&json!({
                "ids": ids,
                "embeddings": embeddings,
                "documents": chunks,
                "metadatas": metadatas,
            }))
            .send()
            .await
            .map_err(|e| AppError::Retrieval(format!("Chroma add failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Retrieval(format!(
                "Chroma add returned {status}: {body}"
            )));
        }

        debug!("Indexed {} chunks into Chroma", ids.len());
        Ok(())
    }
}
