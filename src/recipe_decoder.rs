use serde::{Deserialize, Serialize};

// Reference daily intakes used to convert percent-daily-value to grams:
// 78g fat, 50g protein, 300g carbohydrate.
const FAT_G_PER_PDV: f64 = 0.78;
const PROTEIN_G_PER_PDV: f64 = 0.50;
const CARBS_G_PER_PDV: f64 = 3.00;

/// Result of decoding a Python-style list literal such as "['a', 'b']".
///
/// The strict path normalizes single quotes and parses the result as JSON.
/// When an element contains an embedded apostrophe that normalization breaks,
/// the permissive path strips the brackets and splits on commas instead. The
/// tag records which path produced the items.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedList {
    Structural(Vec<String>),
    Permissive(Vec<String>),
}

impl DecodedList {
    pub fn into_items(self) -> Vec<String> {
        match self {
            DecodedList::Structural(items) => items,
            DecodedList::Permissive(items) => items,
        }
    }

    pub fn items(&self) -> &[String] {
        match self {
            DecodedList::Structural(items) => items,
            DecodedList::Permissive(items) => items,
        }
    }
}

/// Decode a list-valued CSV field (ingredients, steps, tags).
///
/// Empty input and the literal "[]" decode to an empty list, never an error.
pub fn decode_list_literal(raw: &str) -> DecodedList {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "[]" {
        return DecodedList::Structural(Vec::new());
    }

    let jsonish = trimmed.replace('\'', "\"");
    match serde_json::from_str::<Vec<String>>(&jsonish) {
        Ok(items) => DecodedList::Structural(items),
        Err(_) => {
            let items = trimmed
                .trim_start_matches('[')
                .trim_end_matches(']')
                .split(',')
                .map(|s| s.trim().trim_matches(|c| c == '\'' || c == '"').to_string())
                .filter(|s| !s.is_empty())
                .collect();
            DecodedList::Permissive(items)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub calories: i64,
    pub protein_g: i64,
    pub fat_g: i64,
    pub carbs_g: i64,
}

/// Parse the raw nutrition column.
///
/// Format: [calories, total_fat(PDV), sugar(PDV), sodium(PDV), protein(PDV),
/// sat_fat(PDV), carbs(PDV)]. Sugar, sodium and saturated fat are not kept.
/// Short or unparsable vectors yield all-zero defaults rather than failing
/// the row.
pub fn parse_nutrition(raw: &str) -> NutritionFacts {
    let Ok(values) = serde_json::from_str::<Vec<f64>>(raw.trim()) else {
        return NutritionFacts::default();
    };
    if values.len() < 7 {
        return NutritionFacts::default();
    }
    NutritionFacts {
        calories: values[0].max(0.0).round() as i64,
        fat_g: (values[1] * FAT_G_PER_PDV).max(0.0).round() as i64,
        protein_g: (values[4] * PROTEIN_G_PER_PDV).max(0.0).round() as i64,
        carbs_g: (values[6] * CARBS_G_PER_PDV).max(0.0).round() as i64,
    }
}

/// Render a preparation-time minute count as a human-readable string.
pub fn minutes_to_readable(minutes: i64) -> String {
    if minutes <= 0 {
        return "Unknown".to_string();
    }
    if minutes < 60 {
        return format!("{} minutes", minutes);
    }
    let hours = minutes / 60;
    let rem = minutes % 60;
    if rem == 0 {
        if hours == 1 {
            "1 hour".to_string()
        } else {
            format!("{} hours", hours)
        }
    } else {
        format!("{}h {}m", hours, rem)
    }
}
