use serde::{Deserialize, Serialize};

use crate::api_connection::connection::ApiConnectionError;
use crate::api_connection::endpoints::{
    Content, GenerateContentRequest, GenerationConfig, Provider,
};
use crate::recipe_search::RecipeMatch;

/// Healthier/faster modification suggestions for one recipe.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RecipeVariations {
    pub healthier: Option<String>,
    pub faster: Option<String>,
}

fn joined_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn build_request(prompt: String) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user_text(&prompt)],
        generation_config: Some(GenerationConfig {
            temperature: Some(0.7),
            max_output_tokens: Some(256),
        }),
    }
}

/// Ask Gemini for one concise, practical cooking tip for this recipe.
///
/// Returns Ok(None) when the model produced no usable text; transport and API
/// failures surface as errors for the caller to downgrade to a warning.
pub async fn generate_cooking_tip(
    recipe: &RecipeMatch,
    detected_ingredients: &[String],
    api_key_env_var: &str,
) -> Result<Option<String>, ApiConnectionError> {
    let prompt = format!(
        "You are a helpful cooking assistant. Given this recipe and detected ingredients, \
         provide ONE concise, practical cooking tip or insight (max 2 sentences).\n\n\
         Recipe: {}\n\
         Detected Ingredients: {}\n\
         Recipe Ingredients: {}\n\n\
         Tip:",
        recipe.title,
        joined_or_none(detected_ingredients),
        joined_or_none(&recipe.ingredients),
    );

    let provider = Provider::gemini(api_key_env_var);
    let response = provider.call_generate_content(build_request(prompt)).await?;
    Ok(response.text())
}

/// Ask Gemini for a healthier and a faster variation of this recipe.
///
/// The model is asked for a small JSON object; anything unparsable degrades
/// to empty variations rather than an error, as the upstream behavior did.
pub async fn generate_recipe_variations(
    recipe: &RecipeMatch,
    detected_ingredients: &[String],
    api_key_env_var: &str,
) -> Result<RecipeVariations, ApiConnectionError> {
    let prompt = format!(
        "You are a cooking expert. Given this recipe and detected ingredients, suggest quick \
         modifications (max 1-2 sentences total).\n\n\
         Recipe: {}\n\
         Detected Ingredients: {}\n\n\
         Provide:\n\
         1. A healthier version tip (1 sentence)\n\
         2. A faster version tip (1 sentence)\n\n\
         Format as JSON: {{\"healthier\": \"...\", \"faster\": \"...\"}}",
        recipe.title,
        joined_or_none(detected_ingredients),
    );

    let provider = Provider::gemini(api_key_env_var);
    let response = provider.call_generate_content(build_request(prompt)).await?;
    let Some(text) = response.text() else {
        return Ok(RecipeVariations::default());
    };
    Ok(extract_variations(&text))
}

/// Pull the first {...} span out of the model text and decode it; model chat
/// wrapping around the JSON object is tolerated.
fn extract_variations(text: &str) -> RecipeVariations {
    let Some(start) = text.find('{') else {
        return RecipeVariations::default();
    };
    let Some(end) = text.rfind('}') else {
        return RecipeVariations::default();
    };
    if end < start {
        return RecipeVariations::default();
    }
    serde_json::from_str(&text[start..=end]).unwrap_or_default()
}
