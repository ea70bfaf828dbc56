pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod providers;
pub mod quantity;
pub mod store;
pub mod upload;
pub mod uniffi_bindings;

use std::path::Path;

use log::{debug, info};

pub use builder::{AiService, RecipeImporter, RecipeImporterBuilder};
pub use config::AppConfig;
pub use error::RecipeError;
pub use model::{Recipe, RecipeState, RecipeUpdate};
pub use providers::{AiProvider, ProviderFactory};
pub use quantity::{
    multiply_ingredient, parse_ingredient, parse_quantity, render_quantity, ParsedIngredient,
    ParsedQuantity,
};
pub use store::{FirebaseStore, RecipeStore};
pub use upload::Upload;

/// Extract every recipe from a photo or PDF on disk using the configured
/// default provider.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let recipes = recipe_digitizer::extract_recipes_from_file("card.jpg").await?;
/// for recipe in &recipes {
///     println!("{}", recipe.title);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn extract_recipes_from_file(
    path: impl AsRef<Path>,
) -> Result<Vec<Recipe>, RecipeError> {
    RecipeImporter::builder()
        .file(path.as_ref())
        .build()
        .await
}

/// Rewrite instruction steps for a scaled recipe using the configured
/// default provider. A multiplier of 1 returns the steps untouched.
pub async fn rewrite_instructions(
    instructions: &[String],
    multiplier: f64,
) -> Result<Vec<String>, RecipeError> {
    if multiplier == 1.0 || instructions.is_empty() {
        return Ok(instructions.to_vec());
    }

    let config = AppConfig::load()?;
    let provider = ProviderFactory::get_default_provider(&config)
        .map_err(|e| RecipeError::Rewrite(e.to_string()))?;

    rewrite_instructions_with_provider(provider.as_ref(), instructions, multiplier).await
}

/// Rewrite instruction steps with an explicit provider
pub async fn rewrite_instructions_with_provider(
    provider: &dyn AiProvider,
    instructions: &[String],
    multiplier: f64,
) -> Result<Vec<String>, RecipeError> {
    if multiplier == 1.0 || instructions.is_empty() {
        return Ok(instructions.to_vec());
    }

    debug!(
        "Rewriting {} instructions for multiplier {} with {}",
        instructions.len(),
        multiplier,
        provider.provider_name()
    );
    let rewritten = provider
        .rewrite_instructions(instructions, multiplier)
        .await
        .map_err(|e| RecipeError::Rewrite(e.to_string()))?;

    info!("Rewrote {} instructions", rewritten.len());
    Ok(rewritten)
}
