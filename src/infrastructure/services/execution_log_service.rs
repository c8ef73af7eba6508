//! In-memory execution log service with live streaming
//!
//! Records are keyed by execution id and retained for the process
//! lifetime. Subscribers get the full backlog first and then live
//! entries; the backlog snapshot and the subscriber registration happen
//! under one lock, so a subscriber never misses or duplicates an entry.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::{json, Map, Value};
use tokio::sync::{mpsc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    DomainError, ExecutionRecord, ExecutionStatus, ExecutionStatusReport, LogEntry, LogLevel,
    LogStream,
};
use crate::infrastructure::observability::metrics;

const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

enum StreamEvent {
    Entry(LogEntry),
    Closed,
}

#[derive(Default)]
struct LogState {
    executions: HashMap<String, ExecutionRecord>,
    subscribers: HashMap<String, Vec<mpsc::UnboundedSender<StreamEvent>>>,
}

/// Parameters for one log entry
pub struct LogParams {
    pub level: LogLevel,
    pub message: String,
    pub node_id: Option<String>,
    pub node_type: Option<String>,
    pub metadata: Map<String, Value>,
}

impl LogParams {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            node_id: None,
            node_type: None,
            metadata: Map::new(),
        }
    }

    pub fn with_node(mut self, node_id: impl Into<String>, node_type: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self.node_type = Some(node_type.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        if let Value::Object(map) = metadata {
            self.metadata = map;
        }
        self
    }
}

/// Manages execution records and their live log subscribers
pub struct ExecutionLogService {
    state: Mutex<LogState>,
    heartbeat_interval: Duration,
}

impl std::fmt::Debug for ExecutionLogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionLogService")
            .field("heartbeat_interval", &self.heartbeat_interval)
            .finish_non_exhaustive()
    }
}

impl ExecutionLogService {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LogState::default()),
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
        }
    }

    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Begin a new execution and return its id.
    pub async fn start_execution(
        &self,
        workflow_id: &str,
        user_id: Option<&str>,
        total_nodes: usize,
    ) -> String {
        let execution_id = Uuid::new_v4().to_string();

        {
            let mut state = self.state.lock().await;
            state.executions.insert(
                execution_id.clone(),
                ExecutionRecord::new(
                    execution_id.clone(),
                    workflow_id,
                    user_id.map(str::to_string),
                    total_nodes,
                ),
            );

            let params = LogParams::new(LogLevel::Info, "Workflow execution started")
                .with_metadata(json!({
                    "total_nodes": total_nodes,
                    "user_id": user_id,
                }));
            // record was just inserted, append cannot fail
            let _ = Self::append_locked(&mut state, &execution_id, params);
        }

        metrics::inc_active_executions();

        info!(
            workflow_id,
            execution_id, total_nodes, "Workflow execution started"
        );

        execution_id
    }

    /// Append an entry to a known execution. Unknown ids are an error.
    pub async fn log(
        &self,
        execution_id: &str,
        params: LogParams,
    ) -> Result<LogEntry, DomainError> {
        let mut state = self.state.lock().await;
        Self::append_locked(&mut state, execution_id, params)
    }

    pub async fn log_node_start(
        &self,
        execution_id: &str,
        node_id: &str,
        node_type: &str,
        node_name: &str,
    ) -> Result<LogEntry, DomainError> {
        let params = LogParams::new(
            LogLevel::Info,
            format!("Starting node: {node_name}"),
        )
        .with_node(node_id, node_type)
        .with_metadata(json!({
            "event": "node_started",
            "node_name": node_name,
        }));

        self.log(execution_id, params).await
    }

    /// Mark a node as finished. The completed count is bumped before the
    /// entry is built so the entry already reflects the new progress.
    pub async fn log_node_complete(
        &self,
        execution_id: &str,
        node_id: &str,
        node_type: &str,
        duration_ms: f64,
        output_summary: Option<String>,
    ) -> Result<LogEntry, DomainError> {
        let mut state = self.state.lock().await;

        if let Some(record) = state.executions.get_mut(execution_id) {
            record.completed_nodes += 1;
        }

        let params = LogParams::new(LogLevel::Info, "Node completed successfully")
            .with_node(node_id, node_type)
            .with_metadata(json!({
                "event": "node_completed",
                "duration_ms": (duration_ms * 100.0).round() / 100.0,
                "output_summary": output_summary,
            }));

        Self::append_locked(&mut state, execution_id, params)
    }

    pub async fn log_node_error(
        &self,
        execution_id: &str,
        node_id: &str,
        node_type: &str,
        error: &str,
    ) -> Result<LogEntry, DomainError> {
        let params = LogParams::new(
            LogLevel::Error,
            format!("Node execution failed: {error}"),
        )
        .with_node(node_id, node_type)
        .with_metadata(json!({
            "event": "node_error",
            "error": error,
        }));

        self.log(execution_id, params).await
    }

    /// Move an execution to a terminal status and close its subscribers.
    /// Unknown ids are a no-op; a second completion is a warning no-op.
    pub async fn complete_execution(
        &self,
        execution_id: &str,
        status: ExecutionStatus,
        error: Option<String>,
    ) {
        let mut state = self.state.lock().await;

        let Some(record) = state.executions.get_mut(execution_id) else {
            return;
        };

        if record.status.is_terminal() {
            warn!(execution_id, "Execution already completed, ignoring");
            return;
        }

        record.status = status;
        record.ended_at = Some(chrono::Utc::now());
        record.error = error.clone();

        let duration_seconds = record
            .ended_at
            .map(|ended| (ended - record.started_at).num_milliseconds() as f64 / 1000.0)
            .unwrap_or_default();
        let completed_nodes = record.completed_nodes;
        let total_nodes = record.total_nodes;

        let level = if status == ExecutionStatus::Completed {
            LogLevel::Info
        } else {
            LogLevel::Error
        };
        let mut message = format!("Workflow execution {status}");
        if let Some(ref error) = error {
            message.push_str(&format!(": {error}"));
        }

        let params = LogParams::new(level, message).with_metadata(json!({
            "event": "execution_completed",
            "status": status.as_str(),
            "duration_seconds": (duration_seconds * 1000.0).round() / 1000.0,
            "completed_nodes": completed_nodes,
            "total_nodes": total_nodes,
        }));
        let _ = Self::append_locked(&mut state, execution_id, params);

        // end-of-stream sentinel, then forget the subscribers
        if let Some(senders) = state.subscribers.remove(execution_id) {
            for sender in senders {
                let _ = sender.send(StreamEvent::Closed);
            }
        }

        metrics::dec_active_executions();
    }

    /// Backlog-then-live stream of entries for an execution.
    ///
    /// Idle streams emit heartbeat entries; the stream ends at the
    /// completion sentinel. Subscribing after completion replays the
    /// backlog and ends immediately.
    pub async fn subscribe(&self, execution_id: &str) -> LogStream {
        let (sender, receiver) = mpsc::unbounded_channel();

        {
            let mut state = self.state.lock().await;

            let terminal = match state.executions.get(execution_id) {
                Some(record) => {
                    for entry in &record.logs {
                        let _ = sender.send(StreamEvent::Entry(entry.clone()));
                    }
                    record.status.is_terminal()
                }
                None => false,
            };

            if terminal {
                let _ = sender.send(StreamEvent::Closed);
            } else {
                state
                    .subscribers
                    .entry(execution_id.to_string())
                    .or_default()
                    .push(sender);
            }
        }

        let heartbeat_interval = self.heartbeat_interval;
        let execution_id = execution_id.to_string();

        Box::pin(futures::stream::unfold(
            (receiver, execution_id),
            move |(mut receiver, execution_id)| async move {
                match tokio::time::timeout(heartbeat_interval, receiver.recv()).await {
                    Ok(Some(StreamEvent::Entry(entry))) => Some((entry, (receiver, execution_id))),
                    Ok(Some(StreamEvent::Closed)) | Ok(None) => None,
                    Err(_) => {
                        let heartbeat = LogEntry::heartbeat(&execution_id);
                        Some((heartbeat, (receiver, execution_id)))
                    }
                }
            },
        ))
    }

    pub async fn get_execution(&self, execution_id: &str) -> Option<ExecutionRecord> {
        self.state.lock().await.executions.get(execution_id).cloned()
    }

    pub async fn get_execution_logs(&self, execution_id: &str) -> Vec<LogEntry> {
        self.state
            .lock()
            .await
            .executions
            .get(execution_id)
            .map(|record| record.logs.clone())
            .unwrap_or_default()
    }

    pub async fn get_status_report(&self, execution_id: &str) -> Option<ExecutionStatusReport> {
        self.state
            .lock()
            .await
            .executions
            .get(execution_id)
            .map(ExecutionStatusReport::from)
    }

    fn append_locked(
        state: &mut LogState,
        execution_id: &str,
        params: LogParams,
    ) -> Result<LogEntry, DomainError> {
        let record = state
            .executions
            .get_mut(execution_id)
            .ok_or_else(|| DomainError::not_found(format!("Execution {execution_id} not found")))?;

        let progress = if record.total_nodes > 0 {
            Some(record.progress_percentage())
        } else {
            None
        };

        let entry = LogEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now(),
            level: params.level,
            message: params.message,
            workflow_id: record.workflow_id.clone(),
            execution_id: execution_id.to_string(),
            node_id: params.node_id.clone(),
            node_type: params.node_type,
            step: Some(record.completed_nodes),
            total_steps: Some(record.total_nodes),
            progress,
            metadata: params.metadata,
        };

        record.logs.push(entry.clone());
        if let Some(node_id) = params.node_id {
            record.current_node = Some(node_id);
        }

        if let Some(senders) = state.subscribers.get_mut(execution_id) {
            senders.retain(|sender| sender.send(StreamEvent::Entry(entry.clone())).is_ok());
        }

        Ok(entry)
    }
}

impl Default for ExecutionLogService {
    fn default() -> Self {
        Self::new()
    }
}
