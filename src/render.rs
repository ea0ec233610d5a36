use std::io::{self, Write};

use crate::model::Recipe;

pub const SUCCESS_MESSAGE: &str = "🎉 Your recipe is ready!";
pub const INGREDIENTS_HEADING: &str = "📜 Ingredients";
pub const STEPS_HEADING: &str = "📖 Steps";

/// One declarative display instruction for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Success(String),
    Warning(String),
    Error(String),
    Subheader(String),
    Italic(String),
    Info(String),
    /// Two lists meant to be shown side by side
    Columns { left: Column, right: Column },
    /// Unprocessed text shown for diagnostics
    RawText { heading: String, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub heading: String,
    pub items: Vec<String>,
}

/// Map a recipe to its display directives. Pure: the same recipe always
/// yields the same sequence.
pub fn render_recipe(recipe: &Recipe) -> Vec<Directive> {
    let ingredients = recipe
        .ingredients
        .iter()
        .map(|item| format!("{}: {}", item.name, item.amount))
        .collect();

    vec![
        Directive::Success(SUCCESS_MESSAGE.to_string()),
        Directive::Subheader(recipe.name.clone()),
        Directive::Italic(recipe.description.clone()),
        Directive::Info(format!("Estimated calories: about {} kcal", recipe.calories)),
        Directive::Columns {
            left: Column {
                heading: INGREDIENTS_HEADING.to_string(),
                items: ingredients,
            },
            // Steps already carry their own "1." prefix
            right: Column {
                heading: STEPS_HEADING.to_string(),
                items: recipe.steps.clone(),
            },
        },
    ]
}

/// Writes directives to a terminal (or any writer) as plain text.
///
/// Columns are printed one after the other, ingredients as a bullet list.
pub struct TerminalPresenter<W: Write> {
    out: W,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        TerminalPresenter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn present(&mut self, directives: &[Directive]) -> io::Result<()> {
        for directive in directives {
            self.present_one(directive)?;
        }
        self.out.flush()
    }

    fn present_one(&mut self, directive: &Directive) -> io::Result<()> {
        match directive {
            Directive::Success(text) => writeln!(self.out, "[OK] {}", text),
            Directive::Warning(text) => writeln!(self.out, "[WARN] {}", text),
            Directive::Error(text) => writeln!(self.out, "[ERROR] {}", text),
            Directive::Subheader(text) => writeln!(self.out, "\n🍳 {}\n", text),
            Directive::Italic(text) => writeln!(self.out, "_{}_", text),
            Directive::Info(text) => writeln!(self.out, "[INFO] {}", text),
            Directive::Columns { left, right } => {
                writeln!(self.out, "\n#### {}", left.heading)?;
                for item in &left.items {
                    writeln!(self.out, "- {}", item)?;
                }
                writeln!(self.out, "\n#### {}", right.heading)?;
                for item in &right.items {
                    writeln!(self.out, "{}", item)?;
                }
                Ok(())
            }
            Directive::RawText { heading, body } => {
                writeln!(self.out, "--- {} ---", heading)?;
                writeln!(self.out, "{}", body)
            }
        }
    }
}
