//! In-memory vector store with cosine similarity

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{DomainError, ScoredChunk, VectorStore};

#[derive(Debug, Clone)]
struct StoredChunk {
    id: String,
    text: String,
    metadata: HashMap<String, Value>,
    embedding: Vec<f32>,
}

/// Process-local store; contents are lost on restart
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    chunks: RwLock<Vec<StoredChunk>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Cosine similarity; mismatched lengths compare over the shorter
/// prefix, zero-norm vectors score 0.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for i in 0..len {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn count(&self) -> usize {
        self.chunks.read().await.len()
    }

    async fn add(
        &self,
        embeddings: Vec<Vec<f32>>,
        texts: Vec<String>,
        metadatas: Option<Vec<HashMap<String, Value>>>,
    ) -> Result<Vec<String>, DomainError> {
        if embeddings.len() != texts.len() {
            return Err(DomainError::validation(format!(
                "Embedding count {} does not match text count {}",
                embeddings.len(),
                texts.len()
            )));
        }

        if let Some(ref metadatas) = metadatas {
            if metadatas.len() != texts.len() {
                return Err(DomainError::validation(format!(
                    "Metadata count {} does not match text count {}",
                    metadatas.len(),
                    texts.len()
                )));
            }
        }

        let mut chunks = self.chunks.write().await;
        let mut ids = Vec::with_capacity(texts.len());

        for (index, (embedding, text)) in embeddings.into_iter().zip(texts).enumerate() {
            let id = Uuid::new_v4().to_string();
            let metadata = metadatas
                .as_ref()
                .and_then(|m| m.get(index).cloned())
                .unwrap_or_else(|| {
                    HashMap::from([("source".to_string(), Value::String("upload".to_string()))])
                });

            chunks.push(StoredChunk {
                id: id.clone(),
                text,
                metadata,
                embedding,
            });
            ids.push(id);
        }

        Ok(ids)
    }

    async fn similarity_search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>, DomainError> {
        let chunks = self.chunks.read().await;

        let mut scored: Vec<ScoredChunk> = chunks
            .iter()
            .map(|chunk| ScoredChunk {
                id: chunk.id.clone(),
                text: chunk.text.clone(),
                metadata: chunk.metadata.clone(),
                score: cosine_similarity(query_embedding, &chunk.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);

        Ok(scored)
    }

    async fn delete(&self, ids: &[String]) -> Result<usize, DomainError> {
        let mut chunks = self.chunks.write().await;
        let before = chunks.len();
        chunks.retain(|chunk| !ids.contains(&chunk.id));
        Ok(before - chunks.len())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.chunks.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_and_count() {
        let store = InMemoryVectorStore::new();
        assert_eq!(store.count().await, 0);

        let ids = store
            .add(
                vec![vec![1.0, 0.0], vec![0.0, 1.0]],
                vec!["first".into(), "second".into()],
                None,
            )
            .await
            .unwrap();

        assert_eq!(ids.len(), 2);
        assert_eq!(store.count().await, 2);
    }

    #[tokio::test]
    async fn test_search_orders_by_similarity() {
        let store = InMemoryVectorStore::new();
        store
            .add(
                vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.7, 0.7]],
                vec!["x-axis".into(), "y-axis".into(), "diagonal".into()],
                None,
            )
            .await
            .unwrap();

        let results = store.similarity_search(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "x-axis");
        assert!((results[0].score - 1.0).abs() < 1e-5);
        assert_eq!(results[1].text, "diagonal");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_default_metadata_source() {
        let store = InMemoryVectorStore::new();
        store
            .add(vec![vec![1.0]], vec!["doc".into()], None)
            .await
            .unwrap();

        let results = store.similarity_search(&[1.0], 1).await.unwrap();
        assert_eq!(results[0].source(), "upload");
    }

    #[tokio::test]
    async fn test_mismatched_lengths_rejected() {
        let store = InMemoryVectorStore::new();
        let result = store.add(vec![vec![1.0]], vec![], None).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let store = InMemoryVectorStore::new();
        let ids = store
            .add(
                vec![vec![1.0], vec![2.0]],
                vec!["a".into(), "b".into()],
                None,
            )
            .await
            .unwrap();

        let removed = store.delete(&ids[..1]).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.count().await, 1);

        store.clear().await.unwrap();
        assert_eq!(store.count().await, 0);
    }

    #[test]
    fn test_cosine_similarity_edge_cases() {
        assert_eq!(cosine_similarity(&[], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        // mismatched lengths compare over the shared prefix
        assert!((cosine_similarity(&[1.0, 0.0, 5.0], &[1.0, 0.0]) - 1.0).abs() < 1e-5);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-5);
    }
}
