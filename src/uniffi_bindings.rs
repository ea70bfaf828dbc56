//! UniFFI bindings for recipe-digitizer
//!
//! This module provides FFI-compatible types and functions for use with iOS and Android.
//! The quantity helpers are plain synchronous calls; the AI-backed functions wrap the
//! async Rust API with synchronous functions that manage their own tokio runtime.

use std::fmt;
use std::time::Duration;

use crate::{quantity, AiService, Recipe, RecipeError};

// Re-export UniFFI macro
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible parsed ingredient line
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiParsedIngredient {
    /// Leading quantity, or 1 when the line has none
    pub quantity: f64,
    /// Text after the quantity
    pub unit_and_name: String,
}

impl From<quantity::ParsedIngredient> for FfiParsedIngredient {
    fn from(parsed: quantity::ParsedIngredient) -> Self {
        FfiParsedIngredient {
            quantity: parsed.quantity,
            unit_and_name: parsed.unit_and_name,
        }
    }
}

/// FFI-compatible recipe structure
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipe {
    pub title: String,
    pub description: String,
    pub prep_time: String,
    pub cook_time: String,
    pub servings: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

impl From<Recipe> for FfiRecipe {
    fn from(recipe: Recipe) -> Self {
        FfiRecipe {
            title: recipe.title,
            description: recipe.description,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            servings: recipe.servings,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
        }
    }
}

/// FFI-compatible AI provider enum
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum FfiAiService {
    Google,
    OpenAI,
}

impl From<FfiAiService> for AiService {
    fn from(service: FfiAiService) -> Self {
        match service {
            FfiAiService::Google => AiService::Google,
            FfiAiService::OpenAI => AiService::OpenAI,
        }
    }
}

/// FFI-compatible error type
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiRecipeError {
    /// Network or HTTP failure
    NetworkError { message: String },
    /// File could not be read or has an unsupported type
    InvalidInput { message: String },
    /// The AI service failed to extract or rewrite
    AiError { message: String },
    /// Database failure or missing recipe
    StoreError { message: String },
    /// Configuration error
    ConfigError { message: String },
    /// Runtime error (tokio)
    RuntimeError { message: String },
}

impl fmt::Display for FfiRecipeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiRecipeError::NetworkError { message } => write!(f, "Network error: {}", message),
            FfiRecipeError::InvalidInput { message } => write!(f, "Invalid input: {}", message),
            FfiRecipeError::AiError { message } => write!(f, "AI error: {}", message),
            FfiRecipeError::StoreError { message } => write!(f, "Store error: {}", message),
            FfiRecipeError::ConfigError { message } => write!(f, "Config error: {}", message),
            FfiRecipeError::RuntimeError { message } => write!(f, "Runtime error: {}", message),
        }
    }
}

impl std::error::Error for FfiRecipeError {}

impl From<RecipeError> for FfiRecipeError {
    fn from(err: RecipeError) -> Self {
        let message = err.to_string();
        match err {
            RecipeError::Http(_) => FfiRecipeError::NetworkError { message },
            RecipeError::Io(_) | RecipeError::UnsupportedFileType(_) | RecipeError::Json(_) => {
                FfiRecipeError::InvalidInput { message }
            }
            RecipeError::Extraction(_) | RecipeError::Rewrite(_) => {
                FfiRecipeError::AiError { message }
            }
            RecipeError::Store(_) | RecipeError::NotFound(_) => {
                FfiRecipeError::StoreError { message }
            }
            RecipeError::BuilderError(_) | RecipeError::ConfigError(_) => {
                FfiRecipeError::ConfigError { message }
            }
        }
    }
}

/// Configuration for importing recipes
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiImportConfig {
    /// Optional AI provider (uses default if not specified)
    pub provider: Option<FfiAiService>,
    /// Optional API key (uses environment variable if not specified)
    pub api_key: Option<String>,
    /// Optional model name (uses provider default if not specified)
    pub model: Option<String>,
    /// Optional timeout in seconds (uses default if not specified)
    pub timeout_seconds: Option<u64>,
}

/// Parse the leading quantity of an ingredient line
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn parse_ingredient(line: String) -> FfiParsedIngredient {
    quantity::parse_ingredient(&line).into()
}

/// Scale the leading quantity of an ingredient line
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn multiply_ingredient(line: String, multiplier: f64) -> String {
    quantity::multiply_ingredient(&line, multiplier)
}

/// Render a positive quantity in kitchen notation
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn render_quantity(value: f64) -> String {
    quantity::render_quantity(value)
}

/// Create a new tokio runtime for FFI calls
fn create_runtime() -> Result<tokio::runtime::Runtime, FfiRecipeError> {
    tokio::runtime::Runtime::new().map_err(|e| FfiRecipeError::RuntimeError {
        message: format!("Failed to create async runtime: {}", e),
    })
}

/// Extract every recipe from a photo or PDF on disk
///
/// # Arguments
/// * `path` - Path to a JPG, PNG, WEBP or PDF file
/// * `config` - Optional configuration for the import
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn import_from_file(
    path: String,
    config: Option<FfiImportConfig>,
) -> Result<Vec<FfiRecipe>, FfiRecipeError> {
    let rt = create_runtime()?;
    rt.block_on(async {
        let builder = configure(crate::RecipeImporter::builder().file(path), config);
        let recipes = builder.build().await?;
        Ok::<_, FfiRecipeError>(recipes.into_iter().map(FfiRecipe::from).collect())
    })
}

/// Extract every recipe from in-memory file contents
///
/// # Arguments
/// * `data` - Raw file bytes
/// * `mime_type` - One of image/jpeg, image/png, image/webp, application/pdf
/// * `config` - Optional configuration for the import
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn import_from_bytes(
    data: Vec<u8>,
    mime_type: String,
    config: Option<FfiImportConfig>,
) -> Result<Vec<FfiRecipe>, FfiRecipeError> {
    let rt = create_runtime()?;
    rt.block_on(async {
        let builder = configure(
            crate::RecipeImporter::builder().bytes(data, mime_type),
            config,
        );
        let recipes = builder.build().await?;
        Ok::<_, FfiRecipeError>(recipes.into_iter().map(FfiRecipe::from).collect())
    })
}

/// Rewrite instruction steps for a scaled recipe with the default provider
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn rewrite_instructions(
    instructions: Vec<String>,
    multiplier: f64,
) -> Result<Vec<String>, FfiRecipeError> {
    let rt = create_runtime()?;
    rt.block_on(async {
        Ok::<_, FfiRecipeError>(crate::rewrite_instructions(&instructions, multiplier).await?)
    })
}

fn configure(
    mut builder: crate::RecipeImporterBuilder,
    config: Option<FfiImportConfig>,
) -> crate::RecipeImporterBuilder {
    let config = config.unwrap_or_default();

    if let Some(provider) = config.provider {
        builder = builder.provider(provider.into());
    }

    if let Some(api_key) = config.api_key {
        builder = builder.api_key(api_key);
    }

    if let Some(model) = config.model {
        builder = builder.model(model);
    }

    if let Some(timeout_secs) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(timeout_secs));
    }

    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ingredient_ffi() {
        let parsed = parse_ingredient("1 1/2 cups sugar".to_string());
        assert_eq!(parsed.quantity, 1.5);
        assert_eq!(parsed.unit_and_name, "cups sugar");
    }

    #[test]
    fn test_multiply_ingredient_ffi() {
        assert_eq!(
            multiply_ingredient("2 cups flour".to_string(), 1.5),
            "3 cups flour"
        );
    }

    #[test]
    fn test_recipe_conversion() {
        let recipe = Recipe {
            title: "Soup".to_string(),
            ingredients: vec!["1 onion".to_string()],
            ..Default::default()
        };
        let ffi: FfiRecipe = recipe.into();
        assert_eq!(ffi.title, "Soup");
        assert_eq!(ffi.ingredients, vec!["1 onion"]);
        assert!(ffi.prep_time.is_empty());
    }

    #[test]
    fn test_error_conversion() {
        let err: FfiRecipeError = RecipeError::UnsupportedFileType("image/gif".to_string()).into();
        assert!(matches!(err, FfiRecipeError::InvalidInput { .. }));
        assert!(err.to_string().contains("image/gif"));

        let err: FfiRecipeError = RecipeError::NotFound("-Nabc".to_string()).into();
        assert!(matches!(err, FfiRecipeError::StoreError { .. }));
    }

    #[test]
    fn test_import_from_bytes_rejects_unsupported_type() {
        let result = import_from_bytes(b"hello".to_vec(), "text/plain".to_string(), None);
        assert!(matches!(result, Err(FfiRecipeError::InvalidInput { .. })));
    }

    #[test]
    fn test_rewrite_identity_needs_no_provider() {
        let steps = vec!["Mix.".to_string()];
        assert_eq!(rewrite_instructions(steps.clone(), 1.0).unwrap(), steps);
    }
}
