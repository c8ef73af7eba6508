//! Provider fallback for text generation
//!
//! Backends are tried in a deterministic order and each outcome is
//! inspected explicitly; no more than two attempts are made per request.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::{DomainError, GenerationBackend, GenerationRequest, TextGenerator};

/// Ordered multi-provider generator.
///
/// The first registered backend is the default primary; an explicit
/// `provider` on the request (or a `gpt*` model) promotes the matching
/// backend to primary for that request.
#[derive(Debug, Default)]
pub struct FallbackGenerator {
    backends: Vec<Arc<dyn GenerationBackend>>,
}

impl FallbackGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: Arc<dyn GenerationBackend>) -> Self {
        self.backends.push(backend);
        self
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    fn preferred_name(request: &GenerationRequest) -> Option<&str> {
        match request.provider.as_deref() {
            Some("openai") => Some("openai"),
            Some("google") | Some("gemini") => Some("gemini"),
            _ => {
                if request
                    .model
                    .as_deref()
                    .is_some_and(|model| model.contains("gpt"))
                {
                    Some("openai")
                } else {
                    None
                }
            }
        }
    }

    fn ordered_for(&self, request: &GenerationRequest) -> Vec<&Arc<dyn GenerationBackend>> {
        let mut ordered: Vec<&Arc<dyn GenerationBackend>> = self.backends.iter().collect();

        if let Some(preferred) = Self::preferred_name(request) {
            if let Some(position) = ordered.iter().position(|b| b.name() == preferred) {
                let backend = ordered.remove(position);
                ordered.insert(0, backend);
            }
        }

        ordered
    }
}

#[async_trait]
impl TextGenerator for FallbackGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, DomainError> {
        let ordered = self.ordered_for(&request);

        let Some(primary) = ordered.first() else {
            return Err(DomainError::configuration(
                "No LLM provider configured. Set GEMINI_API_KEY or OPENAI_API_KEY.",
            ));
        };

        let prompt = request.build_prompt();

        let primary_error = match primary.generate(&prompt, &request).await {
            Ok(text) => return Ok(text),
            Err(error) => error,
        };

        let Some(secondary) = ordered.get(1) else {
            return Err(primary_error);
        };

        warn!(
            primary = primary.name(),
            secondary = secondary.name(),
            error = %primary_error,
            "Primary generation provider failed, retrying on secondary"
        );

        match secondary.generate(&prompt, &request).await {
            Ok(text) => Ok(text),
            Err(secondary_error) => Err(DomainError::provider(
                "generation",
                format!(
                    "Both providers failed. {}: {}. {}: {}",
                    primary.name(),
                    primary_error,
                    secondary.name(),
                    secondary_error
                ),
            )),
        }
    }
}
