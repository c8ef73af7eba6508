//! Output component: projects the final answer out of the context

use serde_json::Value;

use super::NodeOutput;
use crate::domain::{keys, DomainError, ExecutionContext};

/// Pure projection; never fails.
#[derive(Debug, Default)]
pub struct OutputComponent;

impl OutputComponent {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(
        &self,
        payload: &Value,
        context: &mut ExecutionContext,
    ) -> Result<NodeOutput, DomainError> {
        let answer = {
            let from_context = context.get_str(keys::ANSWER);
            if from_context.is_empty() {
                payload
                    .get("answer")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            } else {
                from_context
            }
        };

        context.set_str(keys::OUTPUT, answer.clone());

        Ok(NodeOutput::Answer { answer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_projects_context_answer() {
        let component = OutputComponent::new();
        let mut context = ExecutionContext::new();
        context.set_str(keys::ANSWER, "the answer");

        let output = component.run(&json!({}), &mut context).await.unwrap();
        assert_eq!(output, NodeOutput::Answer { answer: "the answer".into() });
        assert_eq!(context.get_str(keys::OUTPUT), "the answer");
    }

    #[tokio::test]
    async fn test_falls_back_to_payload_answer() {
        let component = OutputComponent::new();
        let mut context = ExecutionContext::new();

        let output = component
            .run(&json!({"answer": "seeded"}), &mut context)
            .await
            .unwrap();
        assert_eq!(output, NodeOutput::Answer { answer: "seeded".into() });
    }

    #[tokio::test]
    async fn test_empty_everywhere_is_empty_answer() {
        let component = OutputComponent::new();
        let mut context = ExecutionContext::new();

        let output = component.run(&json!({}), &mut context).await.unwrap();
        assert_eq!(output, NodeOutput::Answer { answer: String::new() });
    }
}
