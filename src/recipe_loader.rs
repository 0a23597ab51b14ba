use anyhow::{Context, Result};
use csv::ReaderBuilder;
use sqlx::SqlitePool;
use std::path::Path;

use crate::recipe_record::RecipeRow;
use crate::recipe_store::{count_recipes, insert_batch, recreate_table};

pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Console progress line every this many inserted rows.
const PROGRESS_INTERVAL: u64 = 5000;

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub accepted: u64,
    pub skipped: u64,
    /// Row count read back from the store after the final flush.
    pub verified: i64,
}

/// Load the Food.com recipe CSV into the store, replacing any previous
/// contents.
///
/// Malformed rows are skipped and counted; any store failure aborts the run.
/// Rows already flushed before a failure remain in the store.
pub async fn load_recipes(
    pool: &SqlitePool,
    csv_path: &Path,
    batch_size: usize,
) -> Result<LoadReport> {
    if !csv_path.exists() {
        return Err(anyhow::anyhow!(
            "Recipe CSV file not found at: {:?}",
            csv_path
        ));
    }
    let batch_size = batch_size.max(1);

    recreate_table(pool).await?;

    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open recipe CSV file at {:?}", csv_path))?;
    // flexible: short rows surface as records so the acceptance policy can
    // reject them by field count instead of failing the whole run.
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let mut batch: Vec<RecipeRow> = Vec::with_capacity(batch_size);
    let mut accepted: u64 = 0;
    let mut skipped: u64 = 0;

    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };

        match RecipeRow::from_record(&record) {
            Ok(row) => batch.push(row),
            Err(_) => {
                skipped += 1;
                continue;
            }
        }

        if batch.len() >= batch_size {
            insert_batch(pool, &batch).await?;
            accepted += batch.len() as u64;
            batch.clear();
            if accepted % PROGRESS_INTERVAL == 0 {
                println!("  Inserted {} rows...", accepted);
            }
        }
    }

    if !batch.is_empty() {
        insert_batch(pool, &batch).await?;
        accepted += batch.len() as u64;
    }

    let verified = count_recipes(pool).await?;
    Ok(LoadReport {
        accepted,
        skipped,
        verified,
    })
}
