mod firebase;

pub use firebase::FirebaseStore;

use async_trait::async_trait;

use crate::model::{Recipe, RecipeState, RecipeUpdate};
use crate::RecipeError;

/// Remote storage for saved recipes and their user state
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// All saved recipes, newest first
    async fn list(&self) -> Result<Vec<RecipeState>, RecipeError>;

    /// One saved recipe by id
    async fn get(&self, id: &str) -> Result<RecipeState, RecipeError>;

    /// Save freshly extracted recipes with default state. Returns the new
    /// ids in input order.
    async fn add_batch(&self, recipes: &[Recipe]) -> Result<Vec<String>, RecipeError>;

    /// Merge set fields of `update` into a saved recipe
    async fn update(&self, id: &str, update: &RecipeUpdate) -> Result<(), RecipeError>;

    async fn delete(&self, id: &str) -> Result<(), RecipeError>;
}
