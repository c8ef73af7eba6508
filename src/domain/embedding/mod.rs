//! Embedding domain traits

pub mod provider;

pub use provider::Embedder;
