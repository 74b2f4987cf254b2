use linkdump::domain::summarizer::{Summarizer, SummaryRequest};
use linkdump::error::AppError;
use linkdump::infrastructure::summarizer::{ClaudeSummarizer, DEFAULT_MODEL};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> SummaryRequest {
    SummaryRequest {
        url: "https://example.com/long-read".to_string(),
        title: Some("A Long Read".to_string()),
        description: Some("A very long description".to_string()),
    }
}

fn summarizer(server: &MockServer) -> ClaudeSummarizer {
    ClaudeSummarizer::new("test-key", DEFAULT_MODEL)
        .unwrap()
        .with_base_url(&format!("{}/", server.uri()))
}

#[tokio::test]
async fn test_summarize_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({ "model": DEFAULT_MODEL, "max_tokens": 300 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                { "type": "text", "text": "Summary:  The article explains\n\nthe topic." }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let summary = summarizer(&server).summarize(&request()).await.unwrap();

    assert_eq!(summary, "The article explains the topic.");
}

#[tokio::test]
async fn test_summarize_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = summarizer(&server).summarize(&request()).await.unwrap_err();

    assert!(matches!(err, AppError::Summarize { .. }));
    assert_eq!(err.to_string(), "Claude API error (529)");
}

#[tokio::test]
async fn test_summarize_empty_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": "   " }]
        })))
        .mount(&server)
        .await;

    let err = summarizer(&server).summarize(&request()).await.unwrap_err();

    assert!(matches!(err, AppError::Summarize { .. }));
}

#[tokio::test]
async fn test_summarize_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = summarizer(&server).summarize(&request()).await.unwrap_err();

    assert!(matches!(err, AppError::Summarize { .. }));
}
