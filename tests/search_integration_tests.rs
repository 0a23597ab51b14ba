use anyhow::Result;
use mealsnap::recipe_loader::load_recipes;
use mealsnap::recipe_search::{search_recipes, QueryCriteria, SearchError, MAX_RESULTS};
use mealsnap::recipe_store::connect;
use sqlx::SqlitePool;
use std::io::Write;
use tempfile::TempDir;

const HEADER: &str = "name,id,minutes,contributor_id,submitted,tags,nutrition,n_steps,steps,description,ingredients,n_ingredients";

struct Fixture {
    // Held so the database file outlives the pool
    _dir: TempDir,
    pool: SqlitePool,
}

/// Loads a small, hand-picked recipe set:
///
///   title                 calories  ingredients
///   tomato basil soup          150  diced tomatoes, basil leaves, onion
///   hearty tomato stew         450  tomato sauce, beef, potato
///   chicken alfredo pasta      900  chicken breast, cream, pasta
///   light garden salad          90  lettuce, cucumber, olive oil
async fn load_fixture() -> Result<Fixture> {
    let dir = TempDir::new()?;
    let mut csv = tempfile::NamedTempFile::new()?;
    writeln!(csv, "{}", HEADER)?;
    writeln!(
        csv,
        "tomato basil soup,1,30,7,2020-01-04,\"['soup']\",\"[150.0, 5, 2, 3, 10, 1, 12]\",2,\"['simmer tomatoes', 'blend with basil']\",light,\"['diced tomatoes', 'basil leaves', 'onion']\",3"
    )?;
    writeln!(
        csv,
        "hearty tomato stew,2,90,7,2020-01-05,\"['stew']\",\"[450.0, 20, 4, 8, 40, 6, 30]\",2,\"['brown the beef', 'simmer in tomato sauce']\",rich,\"['tomato sauce', 'beef', 'potato']\",3"
    )?;
    writeln!(
        csv,
        "chicken alfredo pasta,3,40,7,2020-01-06,\"['pasta']\",\"[900.0, 45, 3, 9, 60, 20, 40]\",3,\"['boil pasta', 'cook chicken', 'combine with cream']\",indulgent,\"['chicken breast', 'cream', 'pasta']\",3"
    )?;
    writeln!(
        csv,
        "light garden salad,4,10,7,2020-01-07,\"['salad']\",\"[90.0, 4, 1, 1, 2, 1, 5]\",2,\"['chop vegetables', 'dress with oil']\",fresh,\"['lettuce', 'cucumber', 'olive oil']\",3"
    )?;
    csv.flush()?;

    let pool = connect(&dir.path().join("recipes.db")).await?;
    let report = load_recipes(&pool, csv.path(), 2).await?;
    assert_eq!(report.accepted, 4);
    assert_eq!(report.verified, 4);
    Ok(Fixture { _dir: dir, pool })
}

#[tokio::test]
async fn test_empty_criteria_is_a_validation_error() -> Result<()> {
    let fx = load_fixture().await?;
    let criteria = QueryCriteria::from_inputs(&[], "");
    let result = search_recipes(&fx.pool, &criteria).await;
    assert!(matches!(result, Err(SearchError::EmptyCriteria)));
    Ok(())
}

#[tokio::test]
async fn test_ingredient_substring_match_scores() -> Result<()> {
    let fx = load_fixture().await?;
    let criteria = QueryCriteria::from_inputs(&["tomato".to_string()], "");
    let recipes = search_recipes(&fx.pool, &criteria).await?;

    // "tomato" substring-matches "diced tomatoes" and "tomato sauce"
    assert_eq!(recipes.len(), 2);
    for recipe in &recipes {
        assert!(recipe.match_score.unwrap_or(0) >= 1);
        assert!(recipe.title.contains("tomato"));
    }
    // equal scores tie-break on calories ascending
    assert_eq!(recipes[0].title, "tomato basil soup");
    assert_eq!(recipes[1].title, "hearty tomato stew");
    Ok(())
}

#[tokio::test]
async fn test_keyword_contributes_at_most_one_point() -> Result<()> {
    let fx = load_fixture().await?;

    // "to" would match several entries inside one recipe's ingredient list;
    // the per-keyword cap keeps a two-keyword recipe ahead of it.
    let criteria = QueryCriteria::from_inputs(
        &["tomato".to_string(), "basil".to_string()],
        "",
    );
    let recipes = search_recipes(&fx.pool, &criteria).await?;
    assert!(!recipes.is_empty());
    assert_eq!(recipes[0].title, "tomato basil soup");
    assert_eq!(recipes[0].match_score, Some(2));

    // single keyword, multiple matching entries in the stew: still score 1
    let criteria = QueryCriteria::from_inputs(&["tomato".to_string()], "");
    let recipes = search_recipes(&fx.pool, &criteria).await?;
    let stew = recipes
        .iter()
        .find(|r| r.title == "hearty tomato stew")
        .expect("stew should match");
    assert_eq!(stew.match_score, Some(1));
    Ok(())
}

#[tokio::test]
async fn test_prompt_filters_titles_on_top_of_score() -> Result<()> {
    let fx = load_fixture().await?;
    let criteria = QueryCriteria::from_inputs(&["tomato".to_string()], "stew tonight");
    let recipes = search_recipes(&fx.pool, &criteria).await?;
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].title, "hearty tomato stew");
    Ok(())
}

#[tokio::test]
async fn test_unmatched_prompt_degrades_to_ingredient_only() -> Result<()> {
    let fx = load_fixture().await?;
    let criteria =
        QueryCriteria::from_inputs(&["tomato".to_string()], "xyzzynonexistentword");
    let recipes = search_recipes(&fx.pool, &criteria).await?;

    // title filter matched nothing; the re-query keeps the ingredient matches
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0].title, "tomato basil soup");
    Ok(())
}

#[tokio::test]
async fn test_prompt_only_branch_orders_by_calories() -> Result<()> {
    let fx = load_fixture().await?;
    let criteria = QueryCriteria::from_inputs(&[], "tomato salad");
    let recipes = search_recipes(&fx.pool, &criteria).await?;

    assert_eq!(recipes.len(), 3);
    assert_eq!(recipes[0].title, "light garden salad");
    assert_eq!(recipes[1].title, "tomato basil soup");
    assert_eq!(recipes[2].title, "hearty tomato stew");
    // no score in the prompt-only branch
    for recipe in &recipes {
        assert!(recipe.match_score.is_none());
    }
    Ok(())
}

#[tokio::test]
async fn test_no_match_is_an_explicit_empty_result() -> Result<()> {
    let fx = load_fixture().await?;
    let criteria = QueryCriteria::from_inputs(&["dragonfruit".to_string()], "");
    let recipes = search_recipes(&fx.pool, &criteria).await?;
    assert!(recipes.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_result_set_is_capped() -> Result<()> {
    let fx = load_fixture().await?;
    // every recipe has at least one ingredient containing a vowel-heavy
    // fragment; use four keywords that together hit all rows
    let criteria = QueryCriteria::from_inputs(
        &[
            "tomato".to_string(),
            "chicken".to_string(),
            "lettuce".to_string(),
            "beef".to_string(),
        ],
        "",
    );
    let recipes = search_recipes(&fx.pool, &criteria).await?;
    assert!(recipes.len() <= MAX_RESULTS);
    assert_eq!(recipes.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_rows_carry_decoded_lists_and_derived_fields() -> Result<()> {
    let fx = load_fixture().await?;
    let criteria = QueryCriteria::from_inputs(&["basil".to_string()], "");
    let recipes = search_recipes(&fx.pool, &criteria).await?;
    assert_eq!(recipes.len(), 1);

    let soup = &recipes[0];
    assert_eq!(
        soup.ingredients,
        vec!["diced tomatoes", "basil leaves", "onion"]
    );
    assert_eq!(soup.steps.len(), 2);
    assert_eq!(soup.time_to_make, "30 minutes");
    assert_eq!(soup.calories, 150);
    assert_eq!(soup.protein_g, 5);
    assert_eq!(soup.fat_g, 4);
    assert_eq!(soup.carbs_g, 36);
    Ok(())
}
