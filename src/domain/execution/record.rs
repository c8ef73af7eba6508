//! Per-execution records and status reporting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::log::{ExecutionStatus, LogEntry};

/// Full in-memory record of one workflow execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub execution_id: String,
    pub workflow_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub status: ExecutionStatus,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    pub total_nodes: usize,
    pub completed_nodes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_node: Option<String>,
    pub logs: Vec<LogEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionRecord {
    pub fn new(
        execution_id: impl Into<String>,
        workflow_id: impl Into<String>,
        user_id: Option<String>,
        total_nodes: usize,
    ) -> Self {
        Self {
            execution_id: execution_id.into(),
            workflow_id: workflow_id.into(),
            user_id,
            status: ExecutionStatus::Running,
            started_at: Utc::now(),
            ended_at: None,
            total_nodes,
            completed_nodes: 0,
            current_node: None,
            logs: Vec::new(),
            error: None,
        }
    }

    /// Fraction of nodes completed, as a percentage. Zero-node
    /// executions report no meaningful fraction and read as 0.
    pub fn progress_percentage(&self) -> f64 {
        if self.total_nodes == 0 {
            0.0
        } else {
            (self.completed_nodes as f64 / self.total_nodes as f64) * 100.0
        }
    }
}

/// Snapshot of execution progress for status queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionStatusReport {
    pub execution_id: String,
    pub workflow_id: String,
    pub status: ExecutionStatus,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    pub progress: ExecutionProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionProgress {
    pub completed_nodes: usize,
    pub total_nodes: usize,
    pub percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_node: Option<String>,
}

impl From<&ExecutionRecord> for ExecutionStatusReport {
    fn from(record: &ExecutionRecord) -> Self {
        Self {
            execution_id: record.execution_id.clone(),
            workflow_id: record.workflow_id.clone(),
            status: record.status,
            started_at: record.started_at,
            ended_at: record.ended_at,
            progress: ExecutionProgress {
                completed_nodes: record.completed_nodes,
                total_nodes: record.total_nodes,
                percentage: record.progress_percentage(),
                current_node: record.current_node.clone(),
            },
            error: record.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_running() {
        let record = ExecutionRecord::new("e1", "w1", Some("user".into()), 4);
        assert_eq!(record.status, ExecutionStatus::Running);
        assert_eq!(record.total_nodes, 4);
        assert_eq!(record.completed_nodes, 0);
        assert!(record.ended_at.is_none());
        assert!(record.logs.is_empty());
    }

    #[test]
    fn test_progress_percentage() {
        let mut record = ExecutionRecord::new("e1", "w1", None, 4);
        assert_eq!(record.progress_percentage(), 0.0);

        record.completed_nodes = 1;
        assert_eq!(record.progress_percentage(), 25.0);

        record.completed_nodes = 4;
        assert_eq!(record.progress_percentage(), 100.0);
    }

    #[test]
    fn test_zero_nodes_reads_zero_percent() {
        let record = ExecutionRecord::new("e1", "w1", None, 0);
        assert_eq!(record.progress_percentage(), 0.0);
    }

    #[test]
    fn test_status_report_snapshot() {
        let mut record = ExecutionRecord::new("e1", "w1", None, 2);
        record.completed_nodes = 1;
        record.current_node = Some("n2".into());

        let report = ExecutionStatusReport::from(&record);
        assert_eq!(report.execution_id, "e1");
        assert_eq!(report.progress.completed_nodes, 1);
        assert_eq!(report.progress.percentage, 50.0);
        assert_eq!(report.progress.current_node.as_deref(), Some("n2"));
        assert!(report.error.is_none());
    }
}
