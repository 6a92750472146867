//! Integration tests for the LLM client and the content generator against a
//! live OpenAI-compatible endpoint.
//!
//! Run with: LITELLM_API_KEY=your_key cargo test --test llm_integration -- --ignored

use std::sync::Arc;

use launchpad::assistant::ContentGenerator;
use launchpad::llm::litellm::{GenerationRequest, LiteLlmClient, LlmProvider, Message};
use launchpad::llm::ResponseCache;
use launchpad::storage::MemoryStore;

fn create_test_client() -> LiteLlmClient {
    LiteLlmClient::from_env().expect("client should build from environment")
}

#[tokio::test]
#[ignore] // Run with: cargo test --test llm_integration -- --ignored
async fn test_simple_generation() {
    let client = create_test_client();

    let request = GenerationRequest::new(
        client.default_model(),
        vec![Message::user("What is 2 + 2? Reply with just the number.")],
    )
    .with_temperature(0.0);

    let response = client.generate(request).await;
    assert!(response.is_ok(), "Generation failed: {:?}", response.err());

    let response = response.expect("Should have response");
    let content = response.first_content().expect("Should have content");
    assert!(
        content.contains('4'),
        "Response should contain '4', got: {}",
        content
    );
}

#[tokio::test]
#[ignore]
async fn test_complete_returns_text() {
    let client = create_test_client();
    let text = client
        .complete(client.default_model(), "Say 'ready' and nothing else.", 0.0)
        .await
        .expect("completion should succeed");
    assert!(!text.trim().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_live_ideas_are_cached() {
    let client = create_test_client();
    let model = client.default_model().to_string();
    let cache = ResponseCache::new(Arc::new(MemoryStore::new()));
    let generator = ContentGenerator::new(Arc::new(client), cache, model);

    let skills = vec!["Rust".to_string(), "SQL".to_string()];
    let first = generator.generate_ideas(&skills, "land an internship", 4).await;
    assert!(first.is_ok(), "generation failed: {:?}", first.error);
    assert!(!first.cached);

    let second = generator.generate_ideas(&skills, "land an internship", 4).await;
    assert!(second.cached);
    assert_eq!(first.data, second.data);
}

#[tokio::test]
#[ignore]
async fn test_invalid_api_key() {
    let client = LiteLlmClient::new(
        launchpad::llm::DEFAULT_API_BASE.to_string(),
        Some("invalid-key".to_string()),
        launchpad::llm::DEFAULT_MODEL.to_string(),
    )
    .expect("client should build");

    let request = GenerationRequest::new(client.default_model(), vec![Message::user("test")]);

    let response = client.generate(request).await;
    assert!(response.is_err(), "Should fail with invalid API key");
}
