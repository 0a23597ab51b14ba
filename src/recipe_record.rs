use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::recipe_decoder::{
    decode_list_literal, minutes_to_readable, parse_nutrition, NutritionFacts,
};

// Column indices in RAW_recipes.csv:
// name(0), id(1), minutes(2), contributor_id(3), submitted(4),
// tags(5), nutrition(6), n_steps(7), steps(8), description(9),
// ingredients(10), n_ingredients(11)
const NAME_IDX: usize = 0;
const MINUTES_IDX: usize = 2;
const TAGS_IDX: usize = 5;
const NUTRITION_IDX: usize = 6;
const N_STEPS_IDX: usize = 7;
const STEPS_IDX: usize = 8;
const INGREDIENTS_IDX: usize = 10;
const N_INGREDIENTS_IDX: usize = 11;

pub const EXPECTED_FIELD_COUNT: usize = 12;

/// Very long titles are truncated as a safety measure.
pub const TITLE_MAX_CHARS: usize = 1000;

/// Why a source row was rejected. Rejection skips the row; it is never fatal
/// to the ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    FieldCount(usize),
    NoIngredients,
    NoSteps,
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRejection::FieldCount(found) => write!(
                f,
                "expected {} fields, found {}",
                EXPECTED_FIELD_COUNT, found
            ),
            RowRejection::NoIngredients => write!(f, "no ingredients after decoding"),
            RowRejection::NoSteps => write!(f, "no steps after decoding"),
        }
    }
}

/// A validated, insert-ready recipe row.
///
/// Constructed exactly once per accepted CSV record; a row that fails
/// validation never produces a partially-initialized value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeRow {
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub minutes: i64,
    pub time_to_make: String,
    pub nutrition: NutritionFacts,
    pub tags: Vec<String>,
    pub n_ingredients: i64,
    pub n_steps: i64,
}

fn field<'a>(record: &'a StringRecord, idx: usize) -> &'a str {
    record.get(idx).unwrap_or("")
}

fn parse_count(raw: &str) -> i64 {
    raw.trim().parse::<i64>().unwrap_or(0).max(0)
}

impl RecipeRow {
    /// Validate and decode one raw CSV record.
    ///
    /// Field-level decode failures degrade to safe defaults (empty list,
    /// zero nutrition); only structural problems reject the row.
    pub fn from_record(record: &StringRecord) -> Result<Self, RowRejection> {
        if record.len() < EXPECTED_FIELD_COUNT {
            return Err(RowRejection::FieldCount(record.len()));
        }

        let ingredients = decode_list_literal(field(record, INGREDIENTS_IDX)).into_items();
        if ingredients.is_empty() {
            return Err(RowRejection::NoIngredients);
        }
        let steps = decode_list_literal(field(record, STEPS_IDX)).into_items();
        if steps.is_empty() {
            return Err(RowRejection::NoSteps);
        }

        let title: String = field(record, NAME_IDX).chars().take(TITLE_MAX_CHARS).collect();
        let minutes = parse_count(field(record, MINUTES_IDX));
        let tags = decode_list_literal(field(record, TAGS_IDX)).into_items();
        let nutrition = parse_nutrition(field(record, NUTRITION_IDX));

        Ok(RecipeRow {
            title,
            time_to_make: minutes_to_readable(minutes),
            minutes,
            ingredients,
            steps,
            nutrition,
            tags,
            n_ingredients: parse_count(field(record, N_INGREDIENTS_IDX)),
            n_steps: parse_count(field(record, N_STEPS_IDX)),
        })
    }
}
