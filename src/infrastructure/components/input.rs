//! Input component: seeds the execution context with the user query

use serde_json::Value;

use super::NodeOutput;
use crate::domain::graph::InputSettings;
use crate::domain::{keys, DomainError, ExecutionContext};

#[derive(Debug, Default)]
pub struct InputComponent;

impl InputComponent {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(
        &self,
        settings: &InputSettings,
        payload: &Value,
        context: &mut ExecutionContext,
    ) -> Result<NodeOutput, DomainError> {
        let query = if !settings.query.is_empty() {
            settings.query.clone()
        } else {
            payload
                .get("query")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        context.set_str(keys::QUERY, query.clone());

        Ok(NodeOutput::Query { query })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_settings_query_wins() {
        let component = InputComponent::new();
        let mut context = ExecutionContext::new();

        let output = component
            .run(
                &InputSettings { query: "configured".into() },
                &json!({"query": "runtime"}),
                &mut context,
            )
            .await
            .unwrap();

        assert_eq!(output, NodeOutput::Query { query: "configured".into() });
        assert_eq!(context.get_str(keys::QUERY), "configured");
    }

    #[tokio::test]
    async fn test_falls_back_to_payload() {
        let component = InputComponent::new();
        let mut context = ExecutionContext::new();

        component
            .run(
                &InputSettings { query: String::new() },
                &json!({"query": "runtime"}),
                &mut context,
            )
            .await
            .unwrap();

        assert_eq!(context.get_str(keys::QUERY), "runtime");
    }

    #[tokio::test]
    async fn test_no_query_anywhere() {
        let component = InputComponent::new();
        let mut context = ExecutionContext::new();

        let output = component
            .run(&InputSettings { query: String::new() }, &json!({}), &mut context)
            .await
            .unwrap();

        assert_eq!(output, NodeOutput::Query { query: String::new() });
        assert_eq!(context.get_str(keys::QUERY), "");
    }
}
