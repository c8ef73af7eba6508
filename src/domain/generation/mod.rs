//! Text generation domain types and traits

pub mod provider;
mod request;

pub use provider::{GenerationBackend, TextGenerator};
pub use request::GenerationRequest;
