//! Domain error types

use thiserror::Error;

/// Errors surfaced by the engine's domain layer
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::not_found("execution abc");
        assert_eq!(err.to_string(), "Not found: execution abc");

        let err = DomainError::provider("gemini", "rate limited");
        assert_eq!(err.to_string(), "Provider error (gemini): rate limited");

        let err = DomainError::configuration("no provider");
        assert_eq!(err.to_string(), "Configuration error: no provider");
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            DomainError::validation("bad input"),
            DomainError::validation("bad input")
        );
        assert_ne!(
            DomainError::validation("bad input"),
            DomainError::internal("bad input")
        );
    }
}
