//! Shared mutable context threaded through a single execution

use std::collections::HashMap;

use serde_json::Value;

/// Well-known context keys written by the built-in components
pub mod keys {
    pub const QUERY: &str = "query";
    pub const CONTEXT: &str = "context";
    pub const ANSWER: &str = "answer";
    pub const SOURCES: &str = "sources";
    pub const SCORES: &str = "scores";
    pub const OUTPUT: &str = "output";
}

/// String-keyed bag of JSON values.
///
/// Owned by exactly one execution; never shared across executions.
/// Absent keys read as empty strings so components can chain without
/// presence checks.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    values: HashMap<String, Value>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String view of a key: `""` when absent or null, the string itself
    /// for string values, JSON text otherwise.
    pub fn get_str(&self, key: &str) -> String {
        match self.values.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn set_str(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), Value::String(value.into()));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
