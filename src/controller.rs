use log::{debug, error, info, warn};

use crate::client::GenerationClient;
use crate::error::ChefError;
use crate::model::FormInput;
use crate::parser::parse_response;
use crate::prompt::{build_prompt, PromptOptions};
use crate::render::{render_recipe, Directive};

pub const FORMAT_ERROR_MESSAGE: &str =
    "The AI's answer was not in the expected format. Please try again.";
pub const RAW_RESPONSE_HEADING: &str = "Raw response";

/// Where a submission currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Generating,
    Parsing,
    Rendering,
}

/// Runs one form submission end to end and turns every failure into
/// user-facing directives.
pub struct InteractionController {
    client: GenerationClient,
    options: PromptOptions,
    phase: Phase,
}

impl InteractionController {
    pub fn new(client: GenerationClient, options: PromptOptions) -> Self {
        InteractionController {
            client,
            options,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    /// Always returns to [`Phase::Idle`], whatever the outcome.
    pub async fn submit(&mut self, input: FormInput) -> Vec<Directive> {
        let directives = match self.run(&input).await {
            Ok(directives) => directives,
            Err(err) => failure_directives(err),
        };
        self.enter(Phase::Idle);
        directives
    }

    async fn run(&mut self, input: &FormInput) -> Result<Vec<Directive>, ChefError> {
        self.enter(Phase::Validating);
        if !input.has_main_ingredient() {
            return Err(ChefError::EmptyInput);
        }

        self.enter(Phase::Generating);
        let prompt = build_prompt(input, &self.options);
        info!(
            "Generating recipe for '{}' (diet mode: {})",
            input.main_ingredient, input.diet_mode
        );
        let raw = self.client.generate(&prompt).await?;

        self.enter(Phase::Parsing);
        let recipe = parse_response(&raw)?;

        self.enter(Phase::Rendering);
        Ok(render_recipe(&recipe))
    }

    fn enter(&mut self, phase: Phase) {
        debug!("{:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}

fn failure_directives(err: ChefError) -> Vec<Directive> {
    match err {
        ChefError::EmptyInput => {
            warn!("Submission rejected: no main ingredient");
            vec![Directive::Warning(ChefError::EmptyInput.to_string())]
        }
        ChefError::JsonSyntax { message, raw } => {
            error!("Could not parse model reply: {}", message);
            vec![
                Directive::Error(FORMAT_ERROR_MESSAGE.to_string()),
                Directive::RawText {
                    heading: RAW_RESPONSE_HEADING.to_string(),
                    body: raw,
                },
            ]
        }
        ChefError::GenerationFailed(cause) => {
            vec![Directive::Error(format!(
                "An error occurred while generating the recipe: {}",
                cause
            ))]
        }
        // Raw text is only shown for syntax errors
        other => {
            error!("Recipe generation failed: {}", other);
            vec![Directive::Error(format!(
                "An error occurred while generating the recipe: {}",
                other
            ))]
        }
    }
}
