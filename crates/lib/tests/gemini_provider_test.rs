//! # Gemini Provider Tests
//!
//! Exercises the HTTP contract of `GeminiProvider` against a mock server.

mod common;

use common::setup_tracing;
use serde_json::json;
use tweet_audit::errors::AnalyzerError;
use tweet_audit::providers::ai::{AiProvider, GeminiProvider};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/v1beta/models/test-model:generateContent";

fn gemini_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"},
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_generate_returns_first_candidate_text() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = MockServer::start().await;
    let answer = r#"{"decision": "KEEP", "reason": "harmless"}"#;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(query_param("key", "secret-key"))
        .and(body_partial_json(json!({
            "contents": [{"parts": [{"text": "evaluate this"}]}],
            "generationConfig": {"responseMimeType": "application/json"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(answer)))
        .expect(1)
        .mount(&server)
        .await;

    let provider =
        GeminiProvider::new(&server.uri(), "test-model", "secret-key".to_string()).unwrap();

    // --- 2. Act ---
    let result = provider.generate("evaluate this").await;

    // --- 3. Assert ---
    assert_eq!(result.unwrap(), answer);
}

#[tokio::test]
async fn test_generate_maps_error_status() {
    setup_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("Resource has been exhausted"))
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(&server.uri(), "test-model", "k".to_string()).unwrap();
    let err = provider.generate("prompt").await.unwrap_err();

    match &err {
        AnalyzerError::Api { status, body } => {
            assert_eq!(*status, 429);
            assert!(body.contains("exhausted"));
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
    assert!(tweet_audit::analyzer::is_transient_error(&err));
}

#[tokio::test]
async fn test_generate_without_candidates_is_empty_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(&server.uri(), "test-model", "k".to_string()).unwrap();

    assert_eq!(provider.generate("prompt").await.unwrap(), "");
}

#[tokio::test]
async fn test_generate_connection_failure_is_transport_error() {
    // Nothing listens on port 1.
    let provider =
        GeminiProvider::new("http://127.0.0.1:1", "test-model", "k".to_string()).unwrap();
    let err = provider.generate("prompt").await.unwrap_err();

    assert!(matches!(err, AnalyzerError::Transport(_)));
}

#[test]
fn test_missing_api_key_is_rejected() {
    let err = GeminiProvider::new("http://localhost", "test-model", "  ".to_string()).unwrap_err();

    assert!(matches!(err, AnalyzerError::MissingApiKey));
}

#[test]
fn test_api_url_includes_model() {
    let provider =
        GeminiProvider::new("https://example.com/", "gemini-2.5-flash", "k".to_string()).unwrap();

    assert_eq!(
        provider.api_url(),
        "https://example.com/v1beta/models/gemini-2.5-flash:generateContent"
    );
}
