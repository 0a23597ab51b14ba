use anyhow::Result;
use mealsnap::cli::{parse_args, Command};
use mealsnap::recipe_annotator::{generate_cooking_tip, generate_recipe_variations};
use mealsnap::recipe_loader::load_recipes;
use mealsnap::recipe_search::{search_recipes, QueryCriteria, RecipeMatch, SearchError};
use mealsnap::recipe_store;
use std::env;
use std::path::Path;

// Environment variable holding the Gemini API key
const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

async fn run_load(csv_file: &str, database: &str, batch_size: usize) -> Result<()> {
    println!("Opening recipe database at {}...", database);
    let pool = recipe_store::connect(Path::new(database)).await?;

    println!("Loading recipes from {}...", csv_file);
    let report = load_recipes(&pool, Path::new(csv_file), batch_size).await?;

    println!(
        "\nDone! Inserted {} recipes (skipped {} invalid rows).",
        report.accepted, report.skipped
    );
    println!("Verification: {} rows in RECIPES table.", report.verified);
    Ok(())
}

fn print_recipe(recipe: &RecipeMatch) {
    println!("\n=== {} ===", recipe.title);
    if let Some(score) = recipe.match_score {
        println!("Match score: {}", score);
    }
    println!("Time to make: {}", recipe.time_to_make);
    println!(
        "Nutrition: {} kcal / {}g protein / {}g fat / {}g carbs",
        recipe.calories, recipe.protein_g, recipe.fat_g, recipe.carbs_g
    );
    println!("Ingredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {}", ingredient);
    }
    println!("Steps:");
    for (idx, step) in recipe.steps.iter().enumerate() {
        println!("  {}. {}", idx + 1, step);
    }
}

async fn enrich_with_gemini(recipe: &RecipeMatch, detected_ingredients: &[String]) {
    match generate_cooking_tip(recipe, detected_ingredients, API_KEY_ENV_VAR).await {
        Ok(Some(tip)) => println!("Tip: {}", tip),
        Ok(None) => {}
        Err(e) => eprintln!("Gemini tip generation failed: {}", e),
    }
    match generate_recipe_variations(recipe, detected_ingredients, API_KEY_ENV_VAR).await {
        Ok(variations) => {
            if let Some(healthier) = variations.healthier {
                println!("Healthier: {}", healthier);
            }
            if let Some(faster) = variations.faster {
                println!("Faster: {}", faster);
            }
        }
        Err(e) => eprintln!("Gemini variations failed: {}", e),
    }
}

async fn run_search(ingredients: &[String], prompt: &str, database: &str, no_ai: bool) -> Result<()> {
    let pool = recipe_store::connect_existing(Path::new(database)).await?;

    let criteria = QueryCriteria::from_inputs(ingredients, prompt);
    let recipes = match search_recipes(&pool, &criteria).await {
        Ok(recipes) => recipes,
        Err(SearchError::EmptyCriteria) => {
            return Err(anyhow::anyhow!(
                "Please provide ingredients or a search prompt"
            ));
        }
        Err(e) => return Err(e.into()),
    };

    if recipes.is_empty() {
        println!("No matching recipes found. Try different ingredients or a different prompt.");
        return Ok(());
    }

    let enrich = !no_ai && env::var(API_KEY_ENV_VAR).is_ok();
    for recipe in &recipes {
        print_recipe(recipe);
        if enrich {
            enrich_with_gemini(recipe, &criteria.ingredient_keywords).await;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok(); // Load .env for the Gemini API key

    let cli_args = parse_args();
    match cli_args.command {
        Command::LoadRecipes {
            csv_file,
            database,
            batch_size,
        } => run_load(&csv_file, &database, batch_size).await,
        Command::Search {
            ingredient,
            prompt,
            database,
            no_ai,
        } => run_search(&ingredient, &prompt, &database, no_ai).await,
    }
}
