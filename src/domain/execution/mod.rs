//! Execution-side domain types: context, logs, records, results, engine trait

pub mod context;
mod engine;
mod log;
mod record;
mod result;

pub use context::{keys, ExecutionContext};
pub use engine::{ExecutionRequest, LogStream, WorkflowEngine};
pub use log::{ExecutionStatus, LogEntry, LogLevel};
pub use record::{ExecutionProgress, ExecutionRecord, ExecutionStatusReport};
pub use result::{round_duration_seconds, ExecutionMeta, ExecutionResult};
