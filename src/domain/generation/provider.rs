//! Text generation traits

use async_trait::async_trait;
use std::fmt::Debug;

use super::GenerationRequest;
use crate::domain::DomainError;

/// The seam the Generation component depends on. Implemented by the
/// fallback stack in infrastructure.
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    async fn generate(&self, request: GenerationRequest) -> Result<String, DomainError>;
}

/// One concrete generation provider (Gemini, OpenAI, ...)
#[async_trait]
pub trait GenerationBackend: Send + Sync + Debug {
    /// Generate a completion for an already-assembled prompt
    async fn generate(&self, prompt: &str, request: &GenerationRequest)
        -> Result<String, DomainError>;

    fn name(&self) -> &'static str;

    fn default_model(&self) -> &'static str;
}
