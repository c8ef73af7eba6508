//! Vector storage domain traits

pub mod provider;

pub use provider::{ScoredChunk, VectorStore};
