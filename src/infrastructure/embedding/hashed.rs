//! Deterministic local embedder for unconfigured environments
//!
//! Derives a fixed-dimension vector from a SHA-256 digest of the text.
//! Not semantically meaningful, but stable across processes, so search
//! and tests behave deterministically without an embedding provider.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::domain::{DomainError, Embedder};

pub const DEFAULT_DIMENSIONS: usize = 768;

#[derive(Debug)]
pub struct HashedEmbedder {
    dimensions: usize,
}

impl HashedEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let digest = Sha256::digest(text.as_bytes());

        (0..self.dimensions)
            .map(|i| {
                let byte = digest[i % digest.len()];
                let mixed = byte.wrapping_add((i / digest.len()) as u8);
                (mixed as f32 / 255.0) - 0.5
            })
            .collect()
    }
}

impl Default for HashedEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

#[async_trait]
impl Embedder for HashedEmbedder {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        Ok(self.embed(text))
    }

    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        Ok(texts.iter().map(|t| self.embed(t)).collect())
    }

    fn provider_name(&self) -> &'static str {
        "hashed"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deterministic_and_sized() {
        let embedder = HashedEmbedder::default();
        let a = embedder.embed_query("workflow").await.unwrap();
        let b = embedder.embed_query("workflow").await.unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_DIMENSIONS);
    }

    #[tokio::test]
    async fn test_different_texts_differ() {
        let embedder = HashedEmbedder::new(64);
        let a = embedder.embed_query("alpha").await.unwrap();
        let b = embedder.embed_query("beta").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_values_bounded() {
        let embedder = HashedEmbedder::new(128);
        let vector = embedder.embed_query("bounds").await.unwrap();
        assert!(vector.iter().all(|v| (-0.5..=0.5).contains(v)));
    }
}
