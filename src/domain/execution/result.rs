//! Structured execution results returned to callers

use serde::{Deserialize, Serialize};

use super::log::ExecutionStatus;

/// Final outcome of a workflow execution.
///
/// The engine never returns an `Err` to its caller; failures are encoded
/// here with `error: true` and a failed `_execution` block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
    #[serde(rename = "_execution")]
    pub execution: ExecutionMeta,
}

/// Execution metadata attached to every result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionMeta {
    pub execution_id: String,
    pub workflow_id: String,
    pub duration_seconds: f64,
    pub status: ExecutionStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components_used: Vec<String>,
    pub kb_used: bool,
    pub llm_used: bool,
    pub context_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn success(answer: impl Into<String>, query: impl Into<String>, execution: ExecutionMeta) -> Self {
        Self {
            answer: answer.into(),
            query: Some(query.into()),
            error: false,
            execution,
        }
    }

    pub fn failure(error_message: impl Into<String>, execution: ExecutionMeta) -> Self {
        Self {
            answer: format!("Workflow execution failed: {}", error_message.into()),
            query: None,
            error: true,
            execution,
        }
    }
}

/// Round a duration to millisecond precision for reporting
pub fn round_duration_seconds(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(status: ExecutionStatus) -> ExecutionMeta {
        ExecutionMeta {
            execution_id: "e1".into(),
            workflow_id: "w1".into(),
            duration_seconds: 0.123,
            status,
            components_used: vec!["input".into(), "llm".into()],
            kb_used: false,
            llm_used: true,
            context_length: 0,
            error: None,
        }
    }

    #[test]
    fn test_success_result_serialization() {
        let result = ExecutionResult::success("hi", "q", meta(ExecutionStatus::Completed));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["answer"], "hi");
        assert_eq!(json["query"], "q");
        assert!(json.get("error").is_none());
        assert_eq!(json["_execution"]["status"], "completed");
        assert_eq!(json["_execution"]["llm_used"], true);
    }

    #[test]
    fn test_failure_result() {
        let mut m = meta(ExecutionStatus::Failed);
        m.error = Some("boom".into());
        m.components_used = Vec::new();

        let result = ExecutionResult::failure("boom", m);
        assert!(result.error);
        assert_eq!(result.answer, "Workflow execution failed: boom");
        assert!(result.query.is_none());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error"], true);
        assert_eq!(json["_execution"]["error"], "boom");
        assert!(json["_execution"].get("components_used").is_none());
    }

    #[test]
    fn test_round_duration() {
        assert_eq!(round_duration_seconds(1.23456), 1.235);
        assert_eq!(round_duration_seconds(0.0004), 0.0);
    }
}
