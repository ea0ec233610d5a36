use log::{debug, error};
use std::error::Error;

use crate::error::ChefError;
use crate::model::RawModelResponse;
use crate::providers::LlmProvider;

/// Sends a prompt to the configured provider exactly once
pub struct GenerationClient {
    provider: Box<dyn LlmProvider>,
}

impl GenerationClient {
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        GenerationClient { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Any provider failure is reported as [`ChefError::GenerationFailed`]
    /// with the underlying cause; there is no retry.
    pub async fn generate(&self, prompt: &str) -> Result<RawModelResponse, ChefError> {
        debug!(
            "Sending prompt to {} ({} bytes)",
            self.provider.provider_name(),
            prompt.len()
        );

        match self.provider.generate(prompt).await {
            Ok(text) => Ok(RawModelResponse::from(text)),
            Err(e) => {
                let cause = describe_chain(&*e);
                error!("{} failed: {}", self.provider.provider_name(), cause);
                Err(ChefError::GenerationFailed(cause))
            }
        }
    }
}

/// The error message followed by each distinct `source()` message
fn describe_chain(err: &(dyn Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
