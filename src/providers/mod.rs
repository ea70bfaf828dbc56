mod factory;
mod google;
mod open_ai;
mod prompt;

pub use factory::ProviderFactory;
pub use google::GoogleProvider;
pub use open_ai::OpenAIProvider;
pub use prompt::{build_rewrite_prompt, format_instructions, RECIPE_EXTRACTION_PROMPT};

use async_trait::async_trait;
use serde_json::Value;
use std::error::Error;

use crate::model::Recipe;
use crate::upload::Upload;

pub type ProviderError = Box<dyn Error + Send + Sync>;

/// Unified trait for all generative-AI providers
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Get the provider name (e.g., "google", "openai")
    fn provider_name(&self) -> &str;

    /// Extract every recipe found in a photo or document
    async fn extract_recipes(&self, upload: &Upload) -> Result<Vec<Recipe>, ProviderError>;

    /// Rewrite instructions so their measurements match a scaled recipe.
    /// Returns exactly one string per input instruction.
    async fn rewrite_instructions(
        &self,
        instructions: &[String],
        multiplier: f64,
    ) -> Result<Vec<String>, ProviderError>;
}

/// Parse the model's JSON answer into recipes.
///
/// Accepts a bare array or an object wrapping it under `recipes`.
pub fn parse_recipes(text: &str) -> Result<Vec<Recipe>, ProviderError> {
    let value: Value = serde_json::from_str(strip_code_fence(text))?;
    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => map
            .remove("recipes")
            .ok_or("The API did not return a list of recipes.")?,
        _ => return Err("The API did not return a list of recipes.".into()),
    };
    if !list.is_array() {
        return Err("The API did not return a list of recipes.".into());
    }
    Ok(serde_json::from_value(list)?)
}

/// Parse the model's JSON answer into rewritten instructions, checking that
/// the step count did not change.
///
/// Accepts a bare array or an object wrapping it under `instructions`.
pub fn parse_instructions(text: &str, expected: usize) -> Result<Vec<String>, ProviderError> {
    let value: Value = serde_json::from_str(strip_code_fence(text))?;
    let list = match value {
        Value::Object(mut map) => map.remove("instructions").unwrap_or(Value::Null),
        other => other,
    };
    let Value::Array(items) = list else {
        return Err("API did not return a valid string array for instructions.".into());
    };

    let steps = items
        .into_iter()
        .map(|item| match item {
            Value::String(step) => Ok(step),
            _ => Err("API did not return a valid string array for instructions."),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if steps.len() != expected {
        return Err(format!(
            "API returned {} instructions, expected {}",
            steps.len(),
            expected
        )
        .into());
    }
    Ok(steps)
}

/// Drop a surrounding Markdown code fence some models add to JSON output
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
