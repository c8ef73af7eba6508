//! Workflow engine implementation

mod engine;

pub use engine::DynamicWorkflowEngine;
