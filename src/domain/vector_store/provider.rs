//! Vector store trait and search result types

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

use crate::domain::DomainError;

/// A stored chunk scored against a query embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    /// Cosine similarity in [-1, 1]
    pub score: f32,
}

impl ScoredChunk {
    /// Source tag for attribution, defaulting to "upload"
    pub fn source(&self) -> String {
        self.metadata
            .get("source")
            .and_then(Value::as_str)
            .unwrap_or("upload")
            .to_string()
    }
}

/// Document chunk storage with similarity search
#[async_trait]
pub trait VectorStore: Send + Sync + Debug {
    /// Number of stored chunks
    async fn count(&self) -> usize;

    /// Store chunks; generated ids are returned in input order
    async fn add(
        &self,
        embeddings: Vec<Vec<f32>>,
        texts: Vec<String>,
        metadatas: Option<Vec<HashMap<String, Value>>>,
    ) -> Result<Vec<String>, DomainError>;

    /// Top-k most similar chunks, best first
    async fn similarity_search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>, DomainError>;

    /// Remove specific chunks, returning how many existed
    async fn delete(&self, ids: &[String]) -> Result<usize, DomainError>;

    /// Remove everything
    async fn clear(&self) -> Result<(), DomainError>;
}
