//! Embedding provider trait

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Turns text into vectors for similarity search
#[async_trait]
pub trait Embedder: Send + Sync + Debug {
    /// Embed a search query
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Embed a batch of documents
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError>;

    fn provider_name(&self) -> &'static str;

    fn dimensions(&self) -> usize;
}
