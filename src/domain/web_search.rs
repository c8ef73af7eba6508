//! Web search capability trait

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Produces a human-readable digest of web results for a query.
///
/// Implementations favor returning explanatory text ("not configured",
/// "no results") over errors; the Generation component appends whatever
/// comes back to the prompt context.
#[async_trait]
pub trait WebSearch: Send + Sync + Debug {
    async fn search(&self, query: &str) -> Result<String, DomainError>;
}
