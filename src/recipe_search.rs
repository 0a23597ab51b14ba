use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::error::Error;
use std::fmt;

/// At most this many recipes per search.
pub const MAX_RESULTS: usize = 3;

/// Prompt tokens shorter than this are dropped during normalization.
const MIN_PROMPT_KEYWORD_LEN: usize = 3;

/// Cap on the number of prompt keywords considered.
const MAX_PROMPT_KEYWORDS: usize = 5;

#[derive(Debug)]
pub enum SearchError {
    /// No ingredient keywords and no usable prompt keywords; rejected before
    /// any query is issued.
    EmptyCriteria,
    Query(sqlx::Error),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::EmptyCriteria => {
                write!(f, "Please provide ingredients or a search prompt")
            }
            SearchError::Query(err) => write!(f, "Recipe query failed: {}", err),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SearchError::Query(err) => Some(err),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for SearchError {
    fn from(err: sqlx::Error) -> Self {
        SearchError::Query(err)
    }
}

/// Normalized, per-request search inputs. Not persisted.
#[derive(Debug, Clone, Default)]
pub struct QueryCriteria {
    pub ingredient_keywords: Vec<String>,
    pub prompt_keywords: Vec<String>,
}

impl QueryCriteria {
    /// Lower-case and trim the detected ingredient names, and keep at most
    /// [`MAX_PROMPT_KEYWORDS`] whitespace-separated prompt tokens longer than
    /// two characters.
    pub fn from_inputs(ingredients: &[String], prompt: &str) -> Self {
        let ingredient_keywords = ingredients
            .iter()
            .map(|i| i.to_lowercase().trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();
        let prompt_keywords = prompt
            .to_lowercase()
            .split_whitespace()
            .filter(|w| w.len() >= MIN_PROMPT_KEYWORD_LEN)
            .take(MAX_PROMPT_KEYWORDS)
            .map(|w| w.to_string())
            .collect();
        QueryCriteria {
            ingredient_keywords,
            prompt_keywords,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ingredient_keywords.is_empty() && self.prompt_keywords.is_empty()
    }
}

/// One retrieved recipe, shaped for the caller.
#[derive(Debug, Clone)]
pub struct RecipeMatch {
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub time_to_make: String,
    pub calories: i64,
    pub protein_g: i64,
    pub fat_g: i64,
    pub carbs_g: i64,
    /// Count of distinct ingredient keywords that matched; absent in the
    /// prompt-only branch.
    pub match_score: Option<i64>,
}

const SELECT_COLUMNS: &str = "r.TITLE, r.INGREDIENTS, r.STEPS, r.TIME_TO_MAKE, \
     r.CALORIES, r.PROTEIN_G, r.FAT_G, r.CARBS_G";

/// Find up to [`MAX_RESULTS`] recipes matching the criteria.
///
/// An `Ok` empty vector means the search ran and nothing matched; it is
/// distinct from [`SearchError::EmptyCriteria`].
pub async fn search_recipes(
    pool: &SqlitePool,
    criteria: &QueryCriteria,
) -> Result<Vec<RecipeMatch>, SearchError> {
    if criteria.is_empty() {
        return Err(SearchError::EmptyCriteria);
    }

    if !criteria.ingredient_keywords.is_empty() {
        let matches =
            scored_query(pool, &criteria.ingredient_keywords, &criteria.prompt_keywords).await?;
        if matches.is_empty() && !criteria.prompt_keywords.is_empty() {
            // Degradation path: ingredients matched nothing under the title
            // filter; retry ranked by ingredient score alone.
            return scored_query(pool, &criteria.ingredient_keywords, &[]).await;
        }
        return Ok(matches);
    }

    title_query(pool, &criteria.prompt_keywords).await
}

/// Ingredient-based search with fuzzy substring matching.
///
/// Each keyword contributes at most 1 to the score, however many of the
/// recipe's ingredient entries it matches. All keyword values are bound
/// parameters, never interpolated.
async fn scored_query(
    pool: &SqlitePool,
    ingredient_keywords: &[String],
    prompt_keywords: &[String],
) -> Result<Vec<RecipeMatch>, SearchError> {
    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {}, (", SELECT_COLUMNS));

    for (idx, keyword) in ingredient_keywords.iter().enumerate() {
        if idx > 0 {
            builder.push(" + ");
        }
        builder.push("MAX(CASE WHEN lower(f.value) LIKE ");
        builder.push_bind(format!("%{}%", keyword));
        builder.push(" THEN 1 ELSE 0 END)");
    }

    builder.push(
        ") AS MATCH_SCORE \
         FROM RECIPES r, json_each(r.INGREDIENTS) f \
         GROUP BY r.ID \
         HAVING MATCH_SCORE > 0",
    );

    if !prompt_keywords.is_empty() {
        builder.push(" AND (");
        for (idx, keyword) in prompt_keywords.iter().enumerate() {
            if idx > 0 {
                builder.push(" OR ");
            }
            builder.push("lower(r.TITLE) LIKE ");
            builder.push_bind(format!("%{}%", keyword));
        }
        builder.push(")");
    }

    builder.push(" ORDER BY MATCH_SCORE DESC, r.CALORIES ASC LIMIT ");
    builder.push_bind(MAX_RESULTS as i64);

    let rows = builder.build().fetch_all(pool).await?;
    rows.iter().map(row_to_match).collect::<Result<_, _>>().map_err(SearchError::from)
}

/// Prompt-only search: no score, ordered by calories ascending.
async fn title_query(
    pool: &SqlitePool,
    prompt_keywords: &[String],
) -> Result<Vec<RecipeMatch>, SearchError> {
    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {} FROM RECIPES r WHERE ", SELECT_COLUMNS));

    for (idx, keyword) in prompt_keywords.iter().enumerate() {
        if idx > 0 {
            builder.push(" OR ");
        }
        builder.push("lower(r.TITLE) LIKE ");
        builder.push_bind(format!("%{}%", keyword));
    }

    builder.push(" ORDER BY r.CALORIES ASC LIMIT ");
    builder.push_bind(MAX_RESULTS as i64);

    let rows = builder.build().fetch_all(pool).await?;
    rows.iter().map(row_to_match).collect::<Result<_, _>>().map_err(SearchError::from)
}

/// Decode a stored JSON array column, degrading to an empty list on
/// unexpected contents.
fn decode_stored_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

fn row_to_match(row: &SqliteRow) -> Result<RecipeMatch, sqlx::Error> {
    let ingredients_raw: String = row.try_get("INGREDIENTS")?;
    let steps_raw: String = row.try_get("STEPS")?;
    Ok(RecipeMatch {
        title: row.try_get("TITLE")?,
        ingredients: decode_stored_list(&ingredients_raw),
        steps: decode_stored_list(&steps_raw),
        time_to_make: row.try_get("TIME_TO_MAKE")?,
        calories: row.try_get("CALORIES")?,
        protein_g: row.try_get("PROTEIN_G")?,
        fat_g: row.try_get("FAT_G")?,
        carbs_g: row.try_get("CARBS_G")?,
        match_score: row.try_get("MATCH_SCORE").ok(),
    })
}
