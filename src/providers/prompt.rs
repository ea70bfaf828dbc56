/// The prompt used for extracting structured recipes from an uploaded
/// photo or document.
///
/// The prompt is loaded from `extract_prompt.txt` at compile time using the
/// `include_str!` macro, making it easy to edit without dealing with
/// Rust string syntax.
pub const RECIPE_EXTRACTION_PROMPT: &str = include_str!("extract_prompt.txt");

/// Build the prompt asking the model to rescale measurements in recipe
/// instructions.
pub fn build_rewrite_prompt(multiplier: f64) -> String {
    format!(
        "You are a helpful kitchen assistant specializing in baking. The user is scaling a recipe.
The scaling multiplier is {multiplier}.
Please rewrite the following recipe instructions, carefully adjusting any quantities or measurements (like grams, cups, tsp, ml, etc.).
Do not change the core steps of the recipe, only the values associated with measurements.
Maintain the original structure, tone, and number of steps.
Original instructions are provided as a JSON string array.
Return the updated instructions as a JSON array of strings with the same number of elements as the original."
    )
}

/// User message carrying the instructions to rewrite
pub fn format_instructions(instructions: &[String]) -> Result<String, serde_json::Error> {
    Ok(format!(
        "Original Instructions: {}",
        serde_json::to_string(instructions)?
    ))
}
