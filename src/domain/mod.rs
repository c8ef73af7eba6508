//! Domain layer: graph model, execution types, capability traits

pub mod embedding;
mod error;
pub mod execution;
pub mod generation;
pub mod graph;
pub mod vector_store;
pub mod web_search;

pub use embedding::Embedder;
pub use error::DomainError;
pub use execution::{
    keys, round_duration_seconds, ExecutionContext, ExecutionMeta, ExecutionProgress,
    ExecutionRecord, ExecutionRequest, ExecutionResult, ExecutionStatus, ExecutionStatusReport,
    LogEntry, LogLevel, LogStream, WorkflowEngine,
};
pub use generation::{GenerationBackend, GenerationRequest, TextGenerator};
pub use graph::{
    ComponentKind, EdgeDefinition, ExecutionGraph, GenerationSettings, GraphNode, InputSettings,
    NodeDefinition, NodeSettings, RetrievalSettings, WorkflowDefinition,
};
pub use vector_store::{ScoredChunk, VectorStore};
pub use web_search::WebSearch;
