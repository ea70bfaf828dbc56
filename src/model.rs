use serde::{Deserialize, Serialize};

use crate::quantity::multiply_ingredient;

/// Smallest multiplier a user can set on a recipe
pub const MIN_MULTIPLIER: f64 = 0.1;

/// Highest star rating
pub const MAX_RATING: u8 = 5;

/// A recipe as extracted from an uploaded photo or document.
///
/// Every field falls back to empty when the AI service leaves it out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipe {
    pub title: String,
    pub description: String,
    pub prep_time: String,
    pub cook_time: String,
    /// Free-text yield, e.g. "Makes 12 cookies"
    pub servings: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

impl Recipe {
    /// First whole number in the servings text, or 1 if there is none
    pub fn servings_count(&self) -> u32 {
        let digits: String = self
            .servings
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().unwrap_or(1)
    }
}

/// A saved recipe together with the user's own state for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeState {
    /// Database key; not part of the stored value
    #[serde(skip)]
    pub id: String,
    pub recipe: Recipe,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub notes: String,
    /// Total ingredient cost
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub checked_ingredients: Vec<String>,
}

fn default_multiplier() -> f64 {
    1.0
}

impl RecipeState {
    /// Fresh state for a newly extracted recipe
    pub fn new(recipe: Recipe) -> Self {
        Self {
            id: String::new(),
            recipe,
            multiplier: default_multiplier(),
            rating: 0,
            notes: String::new(),
            cost: 0.0,
            checked_ingredients: Vec::new(),
        }
    }

    /// Ingredient lines scaled by the current multiplier
    pub fn scaled_ingredients(&self) -> Vec<String> {
        self.recipe
            .ingredients
            .iter()
            .map(|line| multiply_ingredient(line, self.multiplier))
            .collect()
    }

    /// Bulleted, scaled ingredient list suitable for copying
    pub fn shopping_list(&self) -> String {
        self.scaled_ingredients()
            .iter()
            .map(|line| format!("• {}", line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Checked state is keyed by the original, unscaled ingredient line
    pub fn is_checked(&self, ingredient: &str) -> bool {
        self.checked_ingredients.iter().any(|i| i == ingredient)
    }

    /// Update that flips the checked state of one ingredient
    pub fn toggle_checked(&self, ingredient: &str) -> RecipeUpdate {
        let checked = if self.is_checked(ingredient) {
            self.checked_ingredients
                .iter()
                .filter(|i| *i != ingredient)
                .cloned()
                .collect()
        } else {
            let mut checked = self.checked_ingredients.clone();
            checked.push(ingredient.to_string());
            checked
        };
        RecipeUpdate::default().checked_ingredients(checked)
    }

    /// Cost divided by the servings count, 0 when either is unset
    pub fn cost_per_serving(&self) -> f64 {
        let servings = self.recipe.servings_count();
        if self.cost > 0.0 && servings > 0 {
            self.cost / f64::from(servings)
        } else {
            0.0
        }
    }

    /// Merge a partial update into this state
    pub fn apply(&mut self, update: &RecipeUpdate) {
        if let Some(multiplier) = update.multiplier {
            self.multiplier = multiplier;
        }
        if let Some(rating) = update.rating {
            self.rating = rating;
        }
        if let Some(notes) = &update.notes {
            self.notes = notes.clone();
        }
        if let Some(cost) = update.cost {
            self.cost = cost;
        }
        if let Some(checked) = &update.checked_ingredients {
            self.checked_ingredients = checked.clone();
        }
    }
}

/// Partial update of a [`RecipeState`]. The recipe itself and its id are
/// never updated; unset fields are left out of the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_ingredients: Option<Vec<String>>,
}

impl RecipeUpdate {
    /// Set the multiplier, clamped to [`MIN_MULTIPLIER`]
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        let multiplier = if multiplier.is_nan() {
            MIN_MULTIPLIER
        } else {
            multiplier.max(MIN_MULTIPLIER)
        };
        self.multiplier = Some(multiplier);
        self
    }

    /// Set the star rating, clamped to [`MAX_RATING`]
    pub fn rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating.min(MAX_RATING));
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Set the total cost; negative or NaN becomes 0
    pub fn cost(mut self, cost: f64) -> Self {
        self.cost = Some(if cost > 0.0 { cost } else { 0.0 });
        self
    }

    pub fn checked_ingredients(mut self, checked: Vec<String>) -> Self {
        self.checked_ingredients = Some(checked);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &RecipeUpdate::default()
    }
}
