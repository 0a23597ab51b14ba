use mealsnap::api_connection::{
    connection::ApiConnectionError,
    endpoints::{Content, GenerateContentRequest, GenerationConfig, Provider},
};
use dotenv::dotenv;
use std::env;

const TEST_API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

fn setup_test_environment() {
    dotenv().ok();
}

fn simple_request(text: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user_text(text)],
        generation_config: Some(GenerationConfig {
            temperature: Some(0.2),
            max_output_tokens: Some(64),
        }),
    }
}

#[tokio::test]
async fn test_missing_api_key_error() {
    setup_test_environment();
    let provider = Provider::gemini("THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
    let result = provider
        .call_generate_content(simple_request("Hello"))
        .await;
    assert!(matches!(result, Err(ApiConnectionError::MissingApiKey(_))));
    if let Err(ApiConnectionError::MissingApiKey(key_name)) = result {
        assert_eq!(key_name, "THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
    }
}

#[tokio::test]
#[ignore]
async fn test_successful_generate_content_call() {
    setup_test_environment();
    if env::var(TEST_API_KEY_ENV_VAR).is_err() {
        println!(
            "Skipping test_successful_generate_content_call: {} not set.",
            TEST_API_KEY_ENV_VAR
        );
        return;
    }

    let provider = Provider::gemini(TEST_API_KEY_ENV_VAR);
    let result = provider
        .call_generate_content(simple_request(
            "What is the capital of France? Respond concisely.",
        ))
        .await;
    assert!(result.is_ok(), "API call failed: {:?}", result.err());
    let response = result.unwrap();
    let text = response.text().expect("expected candidate text");
    assert!(text.to_lowercase().contains("paris"));
}
