use crate::model::FormInput;

/// The prompt template sent to the model for every submission.
///
/// The prompt is loaded from `prompt.txt` at compile time using the
/// `include_str!` macro, making it easy to edit without dealing with
/// Rust string syntax.
///
/// Contains `{{MAIN_INGREDIENT}}`, `{{SUB_INGREDIENTS}}`, `{{COOKING_STYLE}}`
/// and `{{LANGUAGE}}` placeholders, filled in by [`build_prompt`].
pub const RECIPE_PROMPT: &str = include_str!("prompt.txt");

pub const DIET_STYLE: &str = "low-calorie, healthy preparation (steaming, grilling, etc.)";
pub const TASTY_STYLE: &str = "the tastiest preparation";

pub const DEFAULT_LANGUAGE: &str = "Korean";

/// Options that shape the prompt but do not come from the form
#[derive(Debug, Clone)]
pub struct PromptOptions {
    /// Language the model should answer in
    pub language: String,
}

impl Default for PromptOptions {
    fn default() -> Self {
        PromptOptions {
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl PromptOptions {
    pub fn with_language(language: &str) -> Self {
        let trimmed = language.trim();
        if trimmed.is_empty() {
            Self::default()
        } else {
            PromptOptions {
                language: trimmed.to_string(),
            }
        }
    }
}

pub fn cooking_style(diet_mode: bool) -> &'static str {
    if diet_mode {
        DIET_STYLE
    } else {
        TASTY_STYLE
    }
}

/// Fill the template with the form values. Sub-ingredients are embedded verbatim.
pub fn build_prompt(input: &FormInput, options: &PromptOptions) -> String {
    RECIPE_PROMPT
        .replace("{{MAIN_INGREDIENT}}", &input.main_ingredient)
        .replace("{{SUB_INGREDIENTS}}", &input.sub_ingredients)
        .replace("{{COOKING_STYLE}}", cooking_style(input.diet_mode))
        .replace("{{LANGUAGE}}", &options.language)
}
