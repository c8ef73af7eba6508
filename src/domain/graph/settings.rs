//! Typed node settings extracted from the builder's flat `data` bags

use serde_json::Value;

use super::ComponentKind;

/// Per-kind settings, extracted with defaults so partially-configured
/// nodes still execute.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSettings {
    Input(InputSettings),
    Retrieval(RetrievalSettings),
    Generation(GenerationSettings),
    Output,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputSettings {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalSettings {
    pub enabled: bool,
    pub top_k: usize,
    pub threshold: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub provider: String,
    pub model: Option<String>,
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl NodeSettings {
    pub fn extract(kind: ComponentKind, data: &Value) -> Self {
        match kind {
            ComponentKind::Input => Self::Input(InputSettings {
                // the builder has used several field names for the seed query
                query: first_str(data, &["query", "userQuery", "value"]).unwrap_or_default(),
            }),
            ComponentKind::Retrieval => Self::Retrieval(RetrievalSettings {
                enabled: bool_field(data, "enabled", true),
                top_k: first_u64(data, &["topK", "top_k"]).unwrap_or(3) as usize,
                threshold: f64_field(data, "threshold", 0.7) as f32,
            }),
            ComponentKind::Generation => Self::Generation(GenerationSettings {
                provider: first_str(data, &["provider"]).unwrap_or_else(|| "google".to_string()),
                model: first_str(data, &["model"]),
                system_prompt: first_str(data, &["systemPrompt"]).unwrap_or_default(),
                temperature: f64_field(data, "temperature", 0.7) as f32,
                max_tokens: first_u64(data, &["maxTokens"]).unwrap_or(4096) as u32,
            }),
            ComponentKind::Output => Self::Output,
        }
    }
}

fn first_str(data: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        data.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn first_u64(data: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| data.get(key).and_then(Value::as_u64))
}

fn bool_field(data: &Value, key: &str, default: bool) -> bool {
    data.get(key).and_then(Value::as_bool).unwrap_or(default)
}

fn f64_field(data: &Value, key: &str, default: f64) -> f64 {
    data.get(key).and_then(Value::as_f64).unwrap_or(default)
}
