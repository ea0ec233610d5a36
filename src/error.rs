use std::fmt;
use thiserror::Error;

/// Errors that can occur while generating a recipe
#[derive(Error, Debug)]
pub enum ChefError {
    /// Configuration could not be loaded or the provider could not be built
    #[error("Configuration error: {0}")]
    StartupConfig(String),

    /// The required main ingredient was left empty
    #[error("Please enter a main ingredient!")]
    EmptyInput,

    /// The text-generation provider failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// The model reply is not valid JSON, even after fence stripping
    #[error("Response is not valid JSON: {message}")]
    JsonSyntax { message: String, raw: String },

    /// The model reply is JSON but does not have the recipe shape
    #[error("Malformed recipe: {}", describe_problems(.0))]
    MalformedRecipe(Vec<FieldProblem>),
}

impl From<config::ConfigError> for ChefError {
    fn from(err: config::ConfigError) -> Self {
        ChefError::StartupConfig(err.to_string())
    }
}

impl ChefError {
    /// Raw model text kept for diagnostics, only present for syntax failures
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            ChefError::JsonSyntax { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// A single schema violation found while validating a recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldProblem {
    /// Path of the offending field, e.g. `ingredients[1].amount`
    pub field: String,
    pub kind: ProblemKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemKind {
    Missing,
    WrongType { expected: &'static str },
}

impl FieldProblem {
    pub fn missing(field: impl Into<String>) -> Self {
        FieldProblem {
            field: field.into(),
            kind: ProblemKind::Missing,
        }
    }

    pub fn wrong_type(field: impl Into<String>, expected: &'static str) -> Self {
        FieldProblem {
            field: field.into(),
            kind: ProblemKind::WrongType { expected },
        }
    }
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ProblemKind::Missing => write!(f, "missing field `{}`", self.field),
            ProblemKind::WrongType { expected } => {
                write!(f, "field `{}` should be {}", self.field, expected)
            }
        }
    }
}

fn describe_problems(problems: &[FieldProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
