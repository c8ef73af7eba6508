//! Engine metrics
//!
//! Uses the `metrics` facade; installing a recorder/exporter is left to
//! the embedding application.

use std::time::Duration;

use metrics::{counter, gauge, histogram};

pub fn record_workflow_execution(status: &str, duration: Duration) {
    let labels = [("status", status.to_string())];
    counter!("workflow_executions_total", &labels).increment(1);
    histogram!("workflow_execution_duration_seconds").record(duration.as_secs_f64());
}

pub fn record_node_execution(node_type: &str, success: bool, duration: Duration) {
    let labels = [
        ("node_type", node_type.to_string()),
        ("status", if success { "success" } else { "error" }.to_string()),
    ];
    counter!("workflow_node_executions_total", &labels).increment(1);

    let duration_labels = [("node_type", node_type.to_string())];
    histogram!("workflow_node_duration_seconds", &duration_labels)
        .record(duration.as_secs_f64());
}

pub fn inc_active_executions() {
    gauge!("active_workflow_executions").increment(1.0);
}

pub fn dec_active_executions() {
    gauge!("active_workflow_executions").decrement(1.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    // the metrics facade no-ops without a recorder; these only assert
    // the helpers are callable with realistic inputs
    #[test]
    fn test_record_helpers_do_not_panic() {
        record_workflow_execution("success", Duration::from_millis(12));
        record_workflow_execution("error", Duration::from_secs(1));
        record_node_execution("llm", true, Duration::from_millis(420));
        record_node_execution("vector_search", false, Duration::from_millis(3));
        inc_active_executions();
        dec_active_executions();
    }
}
