use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

use crate::prompt::DEFAULT_LANGUAGE;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct ChefConfig {
    /// Provider used to generate recipes
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Language the recipe should be written in
    #[serde(default = "default_language")]
    pub language: String,
    /// Request timeout in seconds; unset waits as long as the provider takes
    #[serde(default)]
    pub timeout: Option<u64>,
}

/// Configuration for a specific LLM provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model identifier (e.g., "gemini-1.5-flash-latest", "gpt-4o-mini");
    /// left empty, the provider's own default model is used
    #[serde(default)]
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(model: impl Into<String>) -> Self {
        ProviderConfig {
            enabled: default_enabled(),
            model: model.into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        }
    }
}

impl Default for ChefConfig {
    fn default() -> Self {
        ChefConfig {
            default_provider: default_provider(),
            providers: HashMap::new(),
            language: default_language(),
            timeout: None,
        }
    }
}

// Default value functions
fn default_provider() -> String {
    "google".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Model used when no provider is configured at all
pub const DEFAULT_GOOGLE_MODEL: &str = "gemini-1.5-flash-latest";

impl ChefConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with CHEF__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: CHEF__PROVIDERS__GOOGLE__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Settings for the default provider, falling back to Gemini when the
    /// provider table is empty
    pub fn default_provider_config(&self) -> Option<ProviderConfig> {
        match self.providers.get(&self.default_provider) {
            Some(provider) => Some(provider.clone()),
            None if self.providers.is_empty() && self.default_provider == "google" => {
                Some(ProviderConfig::new(DEFAULT_GOOGLE_MODEL))
            }
            None => None,
        }
    }
}

/// Load configuration from file and environment variables
pub fn load_config() -> Result<ChefConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: CHEF__PROVIDERS__GOOGLE__API_KEY
        .add_source(
            Environment::with_prefix("CHEF")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderFactory;
    use std::env;

    #[test]
    fn test_default_values() {
        assert_eq!(default_provider(), "google");
        assert_eq!(default_temperature(), 0.7);
        assert_eq!(default_max_tokens(), 2000);
        assert_eq!(default_language(), "Korean");
        assert_eq!(ChefConfig::default().timeout, None);
    }

    #[test]
    fn test_empty_provider_table_falls_back_to_gemini() {
        let config = ChefConfig::default();
        let provider = config.default_provider_config().unwrap();
        assert_eq!(provider.model, DEFAULT_GOOGLE_MODEL);
        assert!(provider.enabled);
        assert!(provider.api_key.is_none());
    }

    #[test]
    fn test_unknown_default_provider_has_no_config() {
        let config = ChefConfig {
            default_provider: "openai".to_string(),
            ..ChefConfig::default()
        };
        assert!(config.default_provider_config().is_none());
    }

    #[test]
    fn test_configured_provider_is_used() {
        let mut providers = HashMap::new();
        let mut openai = ProviderConfig::new("gpt-4o-mini");
        openai.api_key = Some("test-key".to_string());
        providers.insert("openai".to_string(), openai);

        let config = ChefConfig {
            default_provider: "openai".to_string(),
            providers,
            ..ChefConfig::default()
        };

        let provider = config.default_provider_config().unwrap();
        assert_eq!(provider.model, "gpt-4o-mini");
        assert_eq!(provider.api_key.as_deref(), Some("test-key"));
    }

    #[test]
    fn test_load_with_only_api_key_in_env() {
        env::set_var("CHEF__PROVIDERS__GOOGLE__API_KEY", "abc");
        let result = load_config();
        env::remove_var("CHEF__PROVIDERS__GOOGLE__API_KEY");

        let config = result.unwrap();
        let google = config.default_provider_config().unwrap();
        assert_eq!(google.api_key.as_deref(), Some("abc"));
        assert!(google.model.is_empty());
        assert!(google.enabled);
        assert_eq!(config.timeout, None);

        let provider = ProviderFactory::get_default_provider(&config).unwrap();
        assert_eq!(provider.provider_name(), "google");
    }

    #[test]
    fn test_deserialize_from_toml() {
        let settings = Config::builder()
            .add_source(File::from_str(
                r#"
                default_provider = "ollama"
                language = "English"
                timeout = 120

                [providers.ollama]
                model = "llama3"
                base_url = "http://localhost:11434"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let config: ChefConfig = settings.try_deserialize().unwrap();
        assert_eq!(config.default_provider, "ollama");
        assert_eq!(config.language, "English");
        assert_eq!(config.timeout, Some(120));

        let ollama = &config.providers["ollama"];
        assert!(ollama.enabled);
        assert_eq!(ollama.model, "llama3");
        assert_eq!(ollama.max_tokens, 2000);
    }
}
