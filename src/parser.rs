//! Turns the model's raw reply into a [`Recipe`].
//!
//! Models often wrap JSON in a markdown code block even when told not to, so
//! the reply first goes through [`strip_code_fence`]. The JSON is then checked
//! field by field so that every schema problem is reported together.

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::error::{ChefError, FieldProblem};
use crate::model::{Ingredient, RawModelResponse, Recipe};

const MIN_FENCE_LEN: usize = 3;

/// Remove a surrounding markdown code fence, if there is one.
///
/// The opening fence may carry a language tag (`json`, `JSON`, ...). A missing
/// closing fence is tolerated, as is a stray closing fence with no opening one.
/// Backticks inside the body are left alone. Text without a fence is only trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();

    match opening_fence_len(trimmed) {
        Some(len) => {
            let after_ticks = &trimmed[len..];
            let body = match after_ticks.find('\n') {
                Some(idx) if is_info_string(&after_ticks[..idx]) => &after_ticks[idx + 1..],
                None if is_info_string(after_ticks) => "",
                // Content on the same line as the fence, e.g. ```{"a": 1}```
                _ => strip_inline_tag(after_ticks),
            };
            strip_closing_fence(body, len).trim()
        }
        None => strip_closing_fence(trimmed, MIN_FENCE_LEN).trim(),
    }
}

fn opening_fence_len(text: &str) -> Option<usize> {
    let ticks = text.bytes().take_while(|b| *b == b'`').count();
    (ticks >= MIN_FENCE_LEN).then_some(ticks)
}

fn is_info_string(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '.'))
}

// ```json {"a": 1}``` keeps the JSON and drops the tag
fn strip_inline_tag(line: &str) -> &str {
    match line.split_once(char::is_whitespace) {
        Some((tag, rest))
            if !tag.is_empty()
                && is_info_string(tag)
                && rest.trim_start().starts_with(['{', '[']) =>
        {
            rest.trim_start()
        }
        _ => line,
    }
}

fn strip_closing_fence(body: &str, min_len: usize) -> &str {
    let trimmed = body.trim_end();
    let ticks = trimmed.bytes().rev().take_while(|b| *b == b'`').count();
    if ticks >= min_len {
        &trimmed[..trimmed.len() - ticks]
    } else {
        trimmed
    }
}

/// Strip fences, parse JSON and validate the recipe shape.
///
/// Invalid JSON keeps the raw reply in [`ChefError::JsonSyntax`] for display.
pub fn parse_response(raw: &RawModelResponse) -> Result<Recipe, ChefError> {
    let body = strip_code_fence(&raw.text);
    debug!("Parsing {} bytes of model output", body.len());

    let value: Value = serde_json::from_str(body).map_err(|e| {
        warn!("Model reply is not valid JSON: {}", e);
        ChefError::JsonSyntax {
            message: e.to_string(),
            raw: raw.text.clone(),
        }
    })?;

    validate_recipe(&value)
}

/// Check a JSON value against the recipe schema, collecting every problem.
pub fn validate_recipe(value: &Value) -> Result<Recipe, ChefError> {
    let Some(object) = value.as_object() else {
        return Err(ChefError::MalformedRecipe(vec![FieldProblem::wrong_type(
            "(root)",
            "an object",
        )]));
    };

    let mut problems = Vec::new();
    let name = string_field(object, "recipe_name", &mut problems);
    let description = string_field(object, "description", &mut problems);
    let calories = calories_field(object, &mut problems);
    let ingredients = ingredients_field(object, &mut problems);
    let steps = steps_field(object, &mut problems);

    if !problems.is_empty() {
        warn!("Model reply has {} schema problem(s)", problems.len());
        return Err(ChefError::MalformedRecipe(problems));
    }

    Ok(Recipe {
        name,
        description,
        calories,
        ingredients,
        steps,
    })
}

fn string_field(
    object: &Map<String, Value>,
    key: &str,
    problems: &mut Vec<FieldProblem>,
) -> String {
    string_at(object.get(key), key.to_string(), problems)
}

fn string_at(value: Option<&Value>, path: String, problems: &mut Vec<FieldProblem>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => {
            problems.push(FieldProblem::missing(path));
            String::new()
        }
        Some(_) => {
            problems.push(FieldProblem::wrong_type(path, "a string"));
            String::new()
        }
    }
}

// The model is asked for "numbers only", so a bare JSON number is accepted too.
fn calories_field(object: &Map<String, Value>, problems: &mut Vec<FieldProblem>) -> String {
    match object.get("calories") {
        Some(Value::Number(n)) => n.to_string(),
        other => string_at(other, "calories".to_string(), problems),
    }
}

fn ingredients_field(
    object: &Map<String, Value>,
    problems: &mut Vec<FieldProblem>,
) -> Vec<Ingredient> {
    let Some(items) = array_field(object, "ingredients", problems) else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item.as_object() {
            Some(entry) => Ingredient {
                name: string_at(entry.get("name"), format!("ingredients[{i}].name"), problems),
                amount: string_at(
                    entry.get("amount"),
                    format!("ingredients[{i}].amount"),
                    problems,
                ),
            },
            None => {
                problems.push(FieldProblem::wrong_type(
                    format!("ingredients[{i}]"),
                    "an object",
                ));
                Ingredient {
                    name: String::new(),
                    amount: String::new(),
                }
            }
        })
        .collect()
}

fn steps_field(object: &Map<String, Value>, problems: &mut Vec<FieldProblem>) -> Vec<String> {
    let Some(items) = array_field(object, "steps", problems) else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .map(|(i, step)| string_at(Some(step), format!("steps[{i}]"), problems))
        .collect()
}

fn array_field<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    problems: &mut Vec<FieldProblem>,
) -> Option<&'a Vec<Value>> {
    match object.get(key) {
        Some(Value::Array(items)) => Some(items),
        None | Some(Value::Null) => {
            problems.push(FieldProblem::missing(key));
            None
        }
        Some(_) => {
            problems.push(FieldProblem::wrong_type(key, "an array"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProblemKind;

    const KIMCHI_STEW: &str = r#"{"recipe_name":"Kimchi Stew","description":"Spicy.","calories":"450","ingredients":[{"name":"kimchi","amount":"200g"}],"steps":["1. Boil"]}"#;

    fn raw(text: &str) -> RawModelResponse {
        RawModelResponse {
            text: text.to_string(),
        }
    }

    fn problems_of(result: Result<Recipe, ChefError>) -> Vec<FieldProblem> {
        match result {
            Err(ChefError::MalformedRecipe(problems)) => problems,
            other => panic!("expected MalformedRecipe, got {:?}", other),
        }
    }

    #[test]
    fn test_strip_no_fence() {
        assert_eq!(strip_code_fence("  {\"a\": 1}\n"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("not json at all"), "not json at all");
    }

    #[test]
    fn test_strip_json_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```JSON\n{\"a\": 1}\n```\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_plain_fence() {
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_partial_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json"), "");
    }

    #[test]
    fn test_strip_fence_on_one_line() {
        assert_eq!(strip_code_fence("```{\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_tag_and_json_on_one_line() {
        assert_eq!(strip_code_fence("```json {\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json [1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fence("```json\t{\"a\": 1}\n```"), "{\"a\": 1}");
        // Not a tag when no JSON follows
        assert_eq!(strip_code_fence("```hello world```"), "hello world");

        let recipe = parse_response(&raw(&format!("```json {}```", KIMCHI_STEW))).unwrap();
        assert_eq!(recipe.name, "Kimchi Stew");
    }

    #[test]
    fn test_strip_keeps_nested_backticks() {
        let body = r#"{"steps": ["Wrap it like ```this``` and serve"]}"#;
        let fenced = format!("```json\n{}\n```", body);
        assert_eq!(strip_code_fence(&fenced), body);
    }

    #[test]
    fn test_strip_longer_fence_needs_matching_close() {
        assert_eq!(strip_code_fence("````json\n{}\n````"), "{}");
        // A shorter closing run does not close a longer fence
        assert_eq!(strip_code_fence("````json\n{}\n```"), "{}\n```");
    }

    #[test]
    fn test_strip_is_idempotent() {
        let once = strip_code_fence("```json\n{\"a\": 1}\n```");
        assert_eq!(strip_code_fence(once), once);
    }

    #[test]
    fn test_fenced_and_bare_json_parse_the_same() {
        let fenced = format!("```json\n{}\n```", KIMCHI_STEW);
        let from_fenced = parse_response(&raw(&fenced)).unwrap();
        let from_bare = parse_response(&raw(KIMCHI_STEW)).unwrap();

        assert_eq!(from_fenced, from_bare);
        assert_eq!(from_bare.name, "Kimchi Stew");
        assert_eq!(from_bare.calories, "450");
        assert_eq!(from_bare.ingredients[0].amount, "200g");
        assert_eq!(from_bare.steps, vec!["1. Boil"]);
    }

    #[test]
    fn test_not_json_keeps_raw_text() {
        let err = parse_response(&raw("not json at all")).unwrap_err();
        match &err {
            ChefError::JsonSyntax { raw, .. } => assert_eq!(raw, "not json at all"),
            other => panic!("expected JsonSyntax, got {:?}", other),
        }
        assert_eq!(err.raw_text(), Some("not json at all"));
    }

    #[test]
    fn test_raw_text_is_unstripped_original() {
        let text = "```json\n{\"recipe_name\": \n```";
        let err = parse_response(&raw(text)).unwrap_err();
        assert_eq!(err.raw_text(), Some(text));
    }

    #[test]
    fn test_missing_steps_is_malformed() {
        let value = r#"{"recipe_name":"Toast","description":"Crunchy.","calories":"200","ingredients":[]}"#;
        let problems = problems_of(parse_response(&raw(value)));
        assert_eq!(problems, vec![FieldProblem::missing("steps")]);
    }

    #[test]
    fn test_every_problem_is_reported() {
        let value = r#"{
            "description": 5,
            "calories": true,
            "ingredients": [{"name": "egg"}, "salt", {"name": "milk", "amount": 100}],
            "steps": ["1. Mix", null]
        }"#;
        let problems = problems_of(parse_response(&raw(value)));

        assert_eq!(
            problems,
            vec![
                FieldProblem::missing("recipe_name"),
                FieldProblem::wrong_type("description", "a string"),
                FieldProblem::wrong_type("calories", "a string"),
                FieldProblem::missing("ingredients[0].amount"),
                FieldProblem::wrong_type("ingredients[1]", "an object"),
                FieldProblem::wrong_type("ingredients[2].amount", "a string"),
                FieldProblem::missing("steps[1]"),
            ]
        );
    }

    #[test]
    fn test_non_object_reply() {
        let problems = problems_of(parse_response(&raw("[1, 2, 3]")));
        assert_eq!(problems.len(), 1);
        assert_eq!(
            problems[0].kind,
            ProblemKind::WrongType {
                expected: "an object"
            }
        );
    }

    #[test]
    fn test_numeric_calories_accepted() {
        let value = r#"{"recipe_name":"Salad","description":"Fresh.","calories":320,"ingredients":[],"steps":[]}"#;
        let recipe = parse_response(&raw(value)).unwrap();
        assert_eq!(recipe.calories, "320");
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.steps.is_empty());
    }

    #[test]
    fn test_order_is_preserved() {
        let value = r#"{"recipe_name":"Stir Fry","description":"Fast.","calories":"500",
            "ingredients":[{"name":"c","amount":"1"},{"name":"a","amount":"2"},{"name":"b","amount":"3"}],
            "steps":["2. Second","1. First"]}"#;
        let recipe = parse_response(&raw(value)).unwrap();

        let names: Vec<&str> = recipe.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert_eq!(recipe.steps, vec!["2. Second", "1. First"]);
    }
}
