//! Embedding provider implementations

mod hashed;
mod openai;

pub use hashed::HashedEmbedder;
pub use openai::OpenAiEmbedder;
