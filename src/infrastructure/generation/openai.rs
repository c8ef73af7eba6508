//! OpenAI chat-completions generation backend

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{DomainError, GenerationBackend, GenerationRequest};
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Debug)]
pub struct OpenAiBackend<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> OpenAiBackend<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<String, DomainError> {
        let response: OpenAiResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse response: {e}"))
        })?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| DomainError::provider("openai", "No choices in response"))
    }
}

#[async_trait]
impl<C: HttpClientTrait> GenerationBackend for OpenAiBackend<C> {
    async fn generate(
        &self,
        prompt: &str,
        request: &GenerationRequest,
    ) -> Result<String, DomainError> {
        let model = request.model.as_deref().unwrap_or(DEFAULT_OPENAI_MODEL);

        let body = serde_json::json!({
            "model": model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        let json = self
            .client
            .post_json(&self.chat_completions_url(), self.headers(), &body)
            .await?;

        self.parse_response(json)
    }

    fn name(&self) -> &'static str {
        "openai"
    }

    fn default_model(&self) -> &'static str {
        DEFAULT_OPENAI_MODEL
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;

    const TEST_URL: &str = "https://api.openai.com/v1/chat/completions";

    #[tokio::test]
    async fn test_generate() {
        let response = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "Hello there."}}]
        });
        let client = MockHttpClient::new().with_response(TEST_URL, response);
        let backend = OpenAiBackend::new(client, "key");

        let answer = backend
            .generate("prompt", &GenerationRequest::new("hi"))
            .await
            .unwrap();
        assert_eq!(answer, "Hello there.");
    }

    #[tokio::test]
    async fn test_missing_content_is_error() {
        let response = serde_json::json!({"choices": [{"message": {"role": "assistant"}}]});
        let client = MockHttpClient::new().with_response(TEST_URL, response);
        let backend = OpenAiBackend::new(client, "key");

        assert!(backend
            .generate("prompt", &GenerationRequest::new("hi"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_custom_base_url() {
        let url = "http://localhost:9000/v1/chat/completions";
        let response = serde_json::json!({
            "choices": [{"message": {"content": "local"}}]
        });
        let client = MockHttpClient::new().with_response(url, response);
        let backend = OpenAiBackend::with_base_url(client, "key", "http://localhost:9000");

        let answer = backend
            .generate("prompt", &GenerationRequest::new("hi"))
            .await
            .unwrap();
        assert_eq!(answer, "local");
    }
}
