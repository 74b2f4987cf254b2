use std::time::Duration;

use linkdump::domain::scraper::ContentScraper;
use linkdump::error::AppError;
use linkdump::infrastructure::scraper::WebContentScraper;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>HTML Title</title>
  <meta name="description" content="HTML description">
  <meta property="og:title" content="OG Title">
  <meta property="og:image" content="https://cdn.example.com/cover.png">
  <meta name="twitter:description" content="Twitter description">
</head>
<body><p>Hello</p></body>
</html>"#;

fn scraper(timeout: Duration) -> WebContentScraper {
    WebContentScraper::new(timeout, "LinkDump Test").unwrap()
}

#[tokio::test]
async fn test_scrape_extracts_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .and(header("user-agent", "LinkDump Test"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PAGE, "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let content = scraper(Duration::from_secs(5))
        .scrape(&format!("{}/article", server.uri()))
        .await
        .unwrap();

    assert_eq!(content.title.as_deref(), Some("OG Title"));
    assert_eq!(content.description.as_deref(), Some("Twitter description"));
    assert_eq!(content.image.as_deref(), Some("https://cdn.example.com/cover.png"));
    assert!(content.content.unwrap().contains("<title>HTML Title</title>"));
}

#[tokio::test]
async fn test_scrape_truncates_content_preview() {
    let server = MockServer::start().await;
    let body = format!("<html><head><title>T</title></head><body>{}</body></html>", "x".repeat(5000));
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(&server)
        .await;

    let content = scraper(Duration::from_secs(5)).scrape(&server.uri()).await.unwrap();

    assert_eq!(content.content.unwrap().chars().count(), 1000);
}

#[tokio::test]
async fn test_scrape_page_without_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html><body>plain</body></html>", "text/html"))
        .mount(&server)
        .await;

    let content = scraper(Duration::from_secs(5)).scrape(&server.uri()).await.unwrap();

    assert!(content.title.is_none());
    assert!(content.description.is_none());
    assert!(content.image.is_none());
}

#[tokio::test]
async fn test_scrape_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = scraper(Duration::from_secs(5)).scrape(&server.uri()).await.unwrap_err();

    assert!(matches!(err, AppError::Scrape { .. }));
    assert_eq!(err.to_string(), "HTTP 404");
}

#[tokio::test]
async fn test_scrape_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(PAGE, "text/html")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = scraper(Duration::from_millis(200)).scrape(&server.uri()).await.unwrap_err();

    assert!(matches!(err, AppError::Scrape { .. }));
    assert_eq!(err.to_string(), "Scrape timed out");
}

#[tokio::test]
async fn test_scrape_unreachable_host() {
    let err = scraper(Duration::from_secs(2))
        .scrape("http://127.0.0.1:1/")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Scrape { .. }));
}
