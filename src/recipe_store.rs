use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::path::Path;

use crate::recipe_record::RecipeRow;

/// Matches the upstream connection pool setting ({ max: 5 }).
pub const POOL_MAX_CONNECTIONS: u32 = 5;

/// Open (or create) the recipe database and return a process-scoped pool.
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(POOL_MAX_CONNECTIONS)
        .connect(&db_url)
        .await
        .with_context(|| format!("Failed to open recipe database at {:?}", db_path))?;
    Ok(pool)
}

/// Open an existing recipe database; refuses to create one.
pub async fn connect_existing(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        anyhow::bail!(
            "Recipe database not found at {:?}. Run the load-recipes command first.",
            db_path
        );
    }
    let db_url = format!("sqlite://{}", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(POOL_MAX_CONNECTIONS)
        .connect(&db_url)
        .await
        .with_context(|| format!("Failed to open recipe database at {:?}", db_path))?;
    Ok(pool)
}

/// Drop and recreate the RECIPES table (full-replace load semantics).
///
/// List-valued columns hold JSON arrays as text so the retrieval queries can
/// expand them with json_each.
pub async fn recreate_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query("DROP TABLE IF EXISTS RECIPES")
        .execute(pool)
        .await
        .context("Failed to drop existing RECIPES table")?;
    sqlx::query(
        r#"
        CREATE TABLE RECIPES (
            ID            INTEGER PRIMARY KEY AUTOINCREMENT,
            TITLE         TEXT NOT NULL,
            INGREDIENTS   TEXT NOT NULL,
            STEPS         TEXT NOT NULL,
            MINUTES       INTEGER NOT NULL,
            TIME_TO_MAKE  TEXT NOT NULL,
            CALORIES      INTEGER NOT NULL,
            PROTEIN_G     INTEGER NOT NULL,
            FAT_G         INTEGER NOT NULL,
            CARBS_G       INTEGER NOT NULL,
            TAGS          TEXT NOT NULL,
            N_INGREDIENTS INTEGER NOT NULL,
            N_STEPS       INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create RECIPES table")?;
    Ok(())
}

/// Insert one batch of accepted rows as a single bulk statement.
pub async fn insert_batch(pool: &SqlitePool, rows: &[RecipeRow]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    // Serialize the list fields up front so the bind closure below stays
    // infallible.
    let mut encoded = Vec::with_capacity(rows.len());
    for row in rows {
        let ingredients =
            serde_json::to_string(&row.ingredients).context("Failed to encode ingredients")?;
        let steps = serde_json::to_string(&row.steps).context("Failed to encode steps")?;
        let tags = serde_json::to_string(&row.tags).context("Failed to encode tags")?;
        encoded.push((row, ingredients, steps, tags));
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        "INSERT INTO RECIPES (TITLE, INGREDIENTS, STEPS, MINUTES, TIME_TO_MAKE, \
         CALORIES, PROTEIN_G, FAT_G, CARBS_G, TAGS, N_INGREDIENTS, N_STEPS) ",
    );
    builder.push_values(encoded.iter(), |mut b, (row, ingredients, steps, tags)| {
        b.push_bind(&row.title)
            .push_bind(ingredients)
            .push_bind(steps)
            .push_bind(row.minutes)
            .push_bind(&row.time_to_make)
            .push_bind(row.nutrition.calories)
            .push_bind(row.nutrition.protein_g)
            .push_bind(row.nutrition.fat_g)
            .push_bind(row.nutrition.carbs_g)
            .push_bind(tags)
            .push_bind(row.n_ingredients)
            .push_bind(row.n_steps);
    });

    builder
        .build()
        .execute(pool)
        .await
        .context("Failed to insert recipe batch")?;
    Ok(())
}

pub async fn count_recipes(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM RECIPES")
        .fetch_one(pool)
        .await
        .context("Failed to count rows in RECIPES table")?;
    Ok(count)
}
