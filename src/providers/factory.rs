use crate::config::{ChefConfig, ProviderConfig};
use crate::error::ChefError;
use crate::providers::{
    AnthropicProvider, GoogleProvider, LlmProvider, OllamaProvider, OpenAIProvider,
};
use std::time::Duration;

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
        timeout: Option<Duration>,
    ) -> Result<Box<dyn LlmProvider>, ChefError> {
        // Validate that provider is enabled
        if !config.enabled {
            return Err(ChefError::StartupConfig(format!(
                "Provider '{}' is not enabled in configuration",
                provider_name
            )));
        }

        let provider: Result<Box<dyn LlmProvider>, _> = match provider_name {
            "google" => GoogleProvider::new(config, timeout).map(boxed),
            "openai" => OpenAIProvider::new(config, timeout).map(boxed),
            "anthropic" => AnthropicProvider::new(config, timeout).map(boxed),
            "ollama" => OllamaProvider::new(config, timeout).map(boxed),
            _ => {
                return Err(ChefError::StartupConfig(format!(
                    "Unknown provider: {}",
                    provider_name
                )))
            }
        };

        provider.map_err(|e| ChefError::StartupConfig(e.to_string()))
    }

    /// Get the default provider from configuration
    pub fn get_default_provider(config: &ChefConfig) -> Result<Box<dyn LlmProvider>, ChefError> {
        let provider_name = &config.default_provider;
        let provider_config = config.default_provider_config().ok_or_else(|| {
            ChefError::StartupConfig(format!(
                "Default provider '{}' not found in configuration",
                provider_name
            ))
        })?;

        let timeout = config.timeout.map(Duration::from_secs);
        Self::create(provider_name, &provider_config, timeout)
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["google", "openai", "anthropic", "ollama"]
    }
}

fn boxed<P: LlmProvider + 'static>(provider: P) -> Box<dyn LlmProvider> {
    Box::new(provider)
}
