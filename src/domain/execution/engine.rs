//! Workflow engine trait and request type

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde_json::Value;

use super::log::LogEntry;
use super::record::ExecutionStatusReport;
use super::result::ExecutionResult;
use crate::domain::graph::WorkflowDefinition;

/// Stream of log entries for one execution
pub type LogStream = Pin<Box<dyn Stream<Item = LogEntry> + Send>>;

/// Everything needed to run one workflow
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub definition: WorkflowDefinition,
    pub payload: Value,
    pub user_id: Option<String>,
    pub workflow_id: Option<String>,
}

impl ExecutionRequest {
    pub fn new(definition: WorkflowDefinition, payload: Value) -> Self {
        Self {
            definition,
            payload,
            user_id: None,
            workflow_id: None,
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_workflow_id(mut self, workflow_id: impl Into<String>) -> Self {
        self.workflow_id = Some(workflow_id.into());
        self
    }
}

/// Executes workflow definitions and exposes their execution logs
#[async_trait]
pub trait WorkflowEngine: Send + Sync + std::fmt::Debug {
    /// Run a workflow to completion. Infallible by contract: failures
    /// come back as a structured failure result.
    async fn execute(&self, request: ExecutionRequest) -> ExecutionResult;

    /// Progress snapshot for a known execution
    async fn execution_status(&self, execution_id: &str) -> Option<ExecutionStatusReport>;

    /// All log entries recorded so far
    async fn execution_logs(&self, execution_id: &str) -> Vec<LogEntry>;

    /// Backlog-then-live log stream with heartbeats
    async fn subscribe(&self, execution_id: &str) -> LogStream;
}
