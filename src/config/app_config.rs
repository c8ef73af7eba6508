//! Application configuration

use serde::Deserialize;

/// Engine configuration, layered from files and environment
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub providers: ProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Capability provider credentials. All optional: the engine degrades
/// to local implementations when a key is absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub serpapi_api_key: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Layer `config/default`, `config/local`, and `APP__`-prefixed
    /// environment variables. Provider keys additionally fall back to
    /// the conventional unprefixed variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.providers.apply_env_fallbacks();

        Ok(app_config)
    }
}

impl ProviderConfig {
    fn apply_env_fallbacks(&mut self) {
        if self.gemini_api_key.is_none() {
            self.gemini_api_key = non_empty_env("GEMINI_API_KEY");
        }
        if self.openai_api_key.is_none() {
            self.openai_api_key = non_empty_env("OPENAI_API_KEY");
        }
        if self.serpapi_api_key.is_none() {
            self.serpapi_api_key = non_empty_env("SERPAPI_API_KEY");
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.providers.gemini_api_key.is_none());
        assert!(config.providers.openai_api_key.is_none());
        assert!(config.providers.serpapi_api_key.is_none());
    }

    #[test]
    fn test_log_format_deserialization() {
        let format: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, LogFormat::Json);
        let format: LogFormat = serde_json::from_str("\"pretty\"").unwrap();
        assert_eq!(format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"logging": {"level": "debug"}}"#).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }
}
