//! Generation component: LLM answer synthesis with optional web search

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use super::NodeOutput;
use crate::domain::graph::GenerationSettings;
use crate::domain::{keys, DomainError, ExecutionContext, GenerationRequest, TextGenerator, WebSearch};

#[derive(Debug)]
pub struct GenerationComponent {
    generator: Arc<dyn TextGenerator>,
    search: Option<Arc<dyn WebSearch>>,
}

impl GenerationComponent {
    pub fn new(generator: Arc<dyn TextGenerator>, search: Option<Arc<dyn WebSearch>>) -> Self {
        Self { generator, search }
    }

    pub async fn run(
        &self,
        settings: &GenerationSettings,
        payload: &Value,
        context: &mut ExecutionContext,
    ) -> Result<NodeOutput, DomainError> {
        let query = {
            let from_context = context.get_str(keys::QUERY);
            if from_context.is_empty() {
                payload
                    .get("query")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            } else {
                from_context
            }
        };

        if query.is_empty() {
            warn!("Generation node has no query");
            return Ok(NodeOutput::Generation {
                answer: "No query provided.".to_string(),
                failed: true,
            });
        }

        let mut kb_context = context.get_str(keys::CONTEXT);

        // web search enrichment is opt-in via the request payload and
        // never fails the node
        let web_search_requested = payload
            .get("web_search")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if web_search_requested {
            if let Some(search) = &self.search {
                match search.search(&query).await {
                    Ok(digest) if !digest.is_empty() => {
                        let web_context = format!("\n\n### Web Search Results:\n{digest}");
                        if kb_context.is_empty() {
                            kb_context = web_context;
                        } else {
                            kb_context.push_str(&web_context);
                        }
                    }
                    Ok(_) => {}
                    Err(error) => {
                        warn!(error = %error, "Web search failed, generating without web context");
                    }
                }
            }
        }

        // the payload-level prompt is the legacy field the builder sent
        // before systemPrompt existed on the node
        let system_prompt = if settings.system_prompt.is_empty() {
            payload
                .get("prompt")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        } else {
            settings.system_prompt.clone()
        };

        let mut request = GenerationRequest::new(&query)
            .with_context(kb_context)
            .with_system_prompt(system_prompt)
            .with_provider(&settings.provider)
            .with_temperature(settings.temperature)
            .with_max_tokens(settings.max_tokens);
        if let Some(model) = &settings.model {
            request = request.with_model(model);
        }

        match self.generator.generate(request).await {
            Ok(answer) => {
                info!(answer_length = answer.len(), "LLM response generated");
                context.set_str(keys::ANSWER, answer.clone());
                Ok(NodeOutput::Generation {
                    answer,
                    failed: false,
                })
            }
            // misconfiguration is user-visible data, not a pipeline failure
            Err(DomainError::Configuration(message)) => {
                let answer = format!("Failed to generate response: Configuration error: {message}");
                warn!(error = %message, "No generation provider configured");
                context.set_str(keys::ANSWER, answer.clone());
                Ok(NodeOutput::Generation {
                    answer,
                    failed: true,
                })
            }
            // provider exhaustion fails the node and with it the execution
            Err(error) => Err(error),
        }
    }
}
