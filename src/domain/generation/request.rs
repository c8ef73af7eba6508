//! Generation request type and prompt assembly

const DEFAULT_INSTRUCTIONS: &str =
    "You are a helpful AI assistant. Answer the question based on the provided context.";

/// A single text-generation request flowing from the Generation
/// component into the provider stack.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub query: String,
    pub context: Option<String>,
    pub system_prompt: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            context: None,
            system_prompt: None,
            provider: None,
            model: None,
            temperature: 0.7,
            max_tokens: 4096,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        if !context.is_empty() {
            self.context = Some(context);
        }
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        let system_prompt = system_prompt.into();
        if !system_prompt.is_empty() {
            self.system_prompt = Some(system_prompt);
        }
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Flatten the request into the prompt text sent to providers.
    pub fn build_prompt(&self) -> String {
        let mut parts = vec![format!(
            "Instructions: {}",
            self.system_prompt.as_deref().unwrap_or(DEFAULT_INSTRUCTIONS)
        )];

        if let Some(context) = self.context.as_deref() {
            parts.push(format!("\nContext:\n{context}"));
        }

        parts.push(format!("\nQuestion: {}", self.query));
        parts.push("\nAnswer:".to_string());

        parts.join("\n")
    }
}
