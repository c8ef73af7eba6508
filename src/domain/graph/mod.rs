//! Workflow graph model: definitions, component kinds, parsing, scheduling

mod definition;
mod kind;
mod parser;
pub mod scheduler;
mod settings;

pub use definition::{EdgeDefinition, NodeDefinition, WorkflowDefinition};
pub use kind::ComponentKind;
pub use parser::{ExecutionGraph, GraphNode};
pub use settings::{GenerationSettings, InputSettings, NodeSettings, RetrievalSettings};
