use log::{debug, error};
use std::env;
use std::process::ExitCode;

use recipe_digitizer::model::RecipeState;
use recipe_digitizer::{
    multiply_ingredient, parse_ingredient, rewrite_instructions, AppConfig, FirebaseStore,
    RecipeError, RecipeImporter, RecipeStore, RecipeUpdate,
};

const USAGE: &str = "Usage: recipe-digitizer <command> [args]

Commands:
  scale <multiplier> <ingredient>...   Scale ingredient lines
  parse <ingredient>...                Show the parsed quantity of ingredient lines
  import <file>                        Extract recipes from a photo or PDF and save them
  list                                 List saved recipes, newest first
  show <id>                            Show a saved recipe at its current multiplier
  shopping <id>                        Print the scaled ingredients as a shopping list
  set <id> <field> <value>             Set multiplier, rating, notes or cost
  check <id> <ingredient>              Toggle an ingredient as checked off
  rewrite <id>                         Rewrite instructions for the current multiplier
  delete <id>                          Delete a saved recipe";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &[String]) -> Result<(), RecipeError> {
    let Some((command, rest)) = args.split_first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    match (command.as_str(), rest) {
        ("scale", [multiplier, lines @ ..]) if !lines.is_empty() => {
            let multiplier = parse_number(multiplier)?;
            for line in lines {
                println!("{}", multiply_ingredient(line, multiplier));
            }
            Ok(())
        }
        ("parse", lines) if !lines.is_empty() => {
            for line in lines {
                let parsed = parse_ingredient(line);
                println!("{}\t{}", parsed.quantity, parsed.unit_and_name);
            }
            Ok(())
        }
        ("import", [path]) => {
            let recipes = RecipeImporter::builder().file(path).build().await?;
            if recipes.is_empty() {
                println!("No recipes found in {}", path);
                return Ok(());
            }
            let ids = open_store()?.add_batch(&recipes).await?;
            for (id, recipe) in ids.iter().zip(&recipes) {
                println!("{}\t{}", id, recipe.title);
            }
            Ok(())
        }
        ("list", []) => {
            for state in open_store()?.list().await? {
                println!(
                    "{}\t{}\t{}",
                    state.id,
                    stars(state.rating),
                    state.recipe.title
                );
            }
            Ok(())
        }
        ("show", [id]) => {
            let state = open_store()?.get(id).await?;
            print_recipe(&state);
            Ok(())
        }
        ("shopping", [id]) => {
            let state = open_store()?.get(id).await?;
            println!("{}", state.shopping_list());
            Ok(())
        }
        ("set", [id, field, value]) => {
            let update = match field.as_str() {
                "multiplier" => RecipeUpdate::default().multiplier(parse_number(value)?),
                "rating" => RecipeUpdate::default().rating(value.parse().map_err(|_| {
                    RecipeError::BuilderError(format!("Invalid rating: {}", value))
                })?),
                "notes" => RecipeUpdate::default().notes(value.as_str()),
                "cost" => RecipeUpdate::default().cost(parse_number(value)?),
                other => {
                    return Err(RecipeError::BuilderError(format!(
                        "Unknown field '{}'. Expected multiplier, rating, notes or cost",
                        other
                    )))
                }
            };
            debug!("Applying {:?} to {}", update, id);
            open_store()?.update(id, &update).await
        }
        ("check", [id, ingredient]) => {
            let store = open_store()?;
            let state = store.get(id).await?;
            if !state.recipe.ingredients.contains(ingredient) {
                return Err(RecipeError::NotFound(format!(
                    "ingredient '{}' in recipe {}",
                    ingredient, id
                )));
            }
            store.update(id, &state.toggle_checked(ingredient)).await
        }
        ("rewrite", [id]) => {
            let state = open_store()?.get(id).await?;
            let steps = rewrite_instructions(&state.recipe.instructions, state.multiplier).await?;
            for (n, step) in steps.iter().enumerate() {
                println!("{}. {}", n + 1, step);
            }
            Ok(())
        }
        ("delete", [id]) => open_store()?.delete(id).await,
        _ => {
            println!("{}", USAGE);
            Err(RecipeError::BuilderError(format!(
                "Invalid arguments for '{}'",
                command
            )))
        }
    }
}

fn open_store() -> Result<FirebaseStore, RecipeError> {
    let config = AppConfig::load()?;
    FirebaseStore::from_config(&config)
}

fn parse_number(value: &str) -> Result<f64, RecipeError> {
    value
        .parse()
        .map_err(|_| RecipeError::BuilderError(format!("Invalid number: {}", value)))
}

fn stars(rating: u8) -> String {
    (1..=5)
        .map(|star| if star <= rating { '★' } else { '☆' })
        .collect()
}

fn print_recipe(state: &RecipeState) {
    let recipe = &state.recipe;
    println!("{}", recipe.title);
    if !recipe.description.is_empty() {
        println!("{}", recipe.description);
    }
    println!(
        "\nPrep: {}  Cook: {}  Yield: {}  (x{})",
        recipe.prep_time, recipe.cook_time, recipe.servings, state.multiplier
    );

    println!("\nIngredients:");
    for (original, scaled) in recipe.ingredients.iter().zip(state.scaled_ingredients()) {
        let mark = if state.is_checked(original) { "x" } else { " " };
        println!("  [{}] {}", mark, scaled);
    }

    println!("\nInstructions:");
    for (n, step) in recipe.instructions.iter().enumerate() {
        println!("  {}. {}", n + 1, step);
    }

    println!("\nRating: {}", stars(state.rating));
    if !state.notes.is_empty() {
        println!("Notes: {}", state.notes);
    }
    if state.cost > 0.0 {
        println!(
            "Cost: {:.2}  ({:.2} per serving)",
            state.cost,
            state.cost_per_serving()
        );
    }
}
