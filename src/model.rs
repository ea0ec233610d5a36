use serde::{Deserialize, Serialize};

/// What the user typed into the form for one submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub main_ingredient: String,
    /// Free text, usually comma separated
    pub sub_ingredients: String,
    pub diet_mode: bool,
}

impl FormInput {
    pub fn new(
        main_ingredient: impl Into<String>,
        sub_ingredients: impl Into<String>,
        diet_mode: bool,
    ) -> Self {
        FormInput {
            main_ingredient: main_ingredient.into(),
            sub_ingredients: sub_ingredients.into(),
            diet_mode,
        }
    }

    pub fn has_main_ingredient(&self) -> bool {
        !self.main_ingredient.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
}

/// A recipe as returned by the model, in model-given order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "recipe_name")]
    pub name: String,
    pub description: String,
    pub calories: String,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
}

/// Unparsed text returned by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawModelResponse {
    pub text: String,
}

impl From<String> for RawModelResponse {
    fn from(text: String) -> Self {
        RawModelResponse { text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_main_ingredient_counts_as_empty() {
        assert!(!FormInput::new("", "garlic", false).has_main_ingredient());
        assert!(!FormInput::new("   \t", "", true).has_main_ingredient());
        assert!(FormInput::new("tofu", "", false).has_main_ingredient());
    }

    #[test]
    fn test_recipe_serializes_with_wire_names() {
        let recipe = Recipe {
            name: "Egg Toast".to_string(),
            description: "Quick breakfast.".to_string(),
            calories: "300".to_string(),
            ingredients: vec![Ingredient {
                name: "egg".to_string(),
                amount: "2".to_string(),
            }],
            steps: vec!["1. Fry the egg".to_string()],
        };

        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(value["recipe_name"], "Egg Toast");
        assert_eq!(value["ingredients"][0]["amount"], "2");
    }
}
