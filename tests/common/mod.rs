#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use linkdump::application::services::{LinkManagementService, LinkOrchestrator};
use linkdump::domain::classifier::ContentClassifier;
use linkdump::domain::entities::Link;
use linkdump::domain::notifier::Notifier;
use linkdump::domain::repositories::LinkRepository;
use linkdump::domain::scraper::{ContentScraper, ScrapedContent};
use linkdump::domain::summarizer::{Summarizer, SummaryRequest};
use linkdump::error::AppError;
use linkdump::infrastructure::persistence::MemoryLinkRepository;
use linkdump::queue::LocalBackgroundRunner;
use linkdump::state::AppState;
use serde_json::json;

pub const STUB_SUMMARY: &str = "Stub summary";

/// Returns fixed page metadata. URLs containing `fail` produce a scrape error.
pub struct StubScraper {
    pub content: ScrapedContent,
}

impl StubScraper {
    pub fn with_description(title: &str, description: &str) -> Self {
        Self {
            content: ScrapedContent {
                title: Some(title.to_string()),
                description: Some(description.to_string()),
                image: None,
                content: None,
            },
        }
    }
}

impl Default for StubScraper {
    fn default() -> Self {
        Self::with_description("Example Page", "Short description")
    }
}

#[async_trait]
impl ContentScraper for StubScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedContent, AppError> {
        if url.contains("fail") {
            return Err(AppError::scrape("HTTP 404", json!({ "url": url })));
        }
        Ok(self.content.clone())
    }
}

pub struct StubSummarizer;

#[async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(&self, _request: &SummaryRequest) -> Result<String, AppError> {
        Ok(STUB_SUMMARY.to_string())
    }
}

/// Records the id of every link it is asked to announce.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn sent_ids(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, link: &Link) {
        self.sent.lock().unwrap().push(link.id().to_string());
    }
}

pub struct TestContext {
    pub state: AppState,
    pub repository: Arc<MemoryLinkRepository>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn create_test_context() -> TestContext {
    create_test_context_with(StubScraper::default())
}

pub fn create_test_context_with(scraper: StubScraper) -> TestContext {
    let repository = Arc::new(MemoryLinkRepository::new());
    let notifier = Arc::new(RecordingNotifier::default());

    let orchestrator = LinkOrchestrator::new(
        repository.clone(),
        Arc::new(scraper),
        Arc::new(StubSummarizer),
        ContentClassifier::default(),
    );

    let runner = Arc::new(LocalBackgroundRunner::new(Duration::from_millis(10)));
    let service = LinkManagementService::new(Arc::new(orchestrator), runner.clone(), notifier.clone());

    let state = AppState::new(
        Arc::new(service),
        repository.clone() as Arc<dyn LinkRepository>,
        runner,
    );

    TestContext {
        state,
        repository,
        notifier,
    }
}
