//! Ask an LLM for a recipe built around the ingredients you have.
//!
//! The pipeline for one submission is: validate the [`FormInput`], fill the
//! prompt template, call the provider once, strip any markdown fence from the
//! reply, validate it as a [`Recipe`] and map it to display [`Directive`]s.
//! [`InteractionController`] drives all of it and never lets a failure escape
//! as anything but a directive.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod providers;
pub mod render;

pub use client::GenerationClient;
pub use config::{ChefConfig, ProviderConfig};
pub use controller::{InteractionController, Phase};
pub use error::{ChefError, FieldProblem, ProblemKind};
pub use model::{FormInput, Ingredient, RawModelResponse, Recipe};
pub use parser::{parse_response, strip_code_fence};
pub use prompt::{build_prompt, PromptOptions};
pub use render::{render_recipe, Column, Directive, TerminalPresenter};

use log::info;

use crate::providers::ProviderFactory;

/// Build a controller for the configured default provider.
///
/// Fails with [`ChefError::StartupConfig`] when the provider is unknown,
/// disabled or has no credential.
pub fn build_controller(config: &ChefConfig) -> Result<InteractionController, ChefError> {
    let provider = ProviderFactory::get_default_provider(config)?;
    info!("Using provider '{}'", provider.provider_name());

    Ok(InteractionController::new(
        GenerationClient::new(provider),
        PromptOptions::with_language(&config.language),
    ))
}
