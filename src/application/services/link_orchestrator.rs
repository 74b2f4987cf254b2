//! Drives links through their lifecycle.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::domain::classifier::ContentClassifier;
use crate::domain::entities::{ContentClassification, ContentType, Link, LinkStatus, ProcessedContent};
use crate::domain::repositories::LinkRepository;
use crate::domain::scraper::ContentScraper;
use crate::domain::summarizer::{Summarizer, SummaryRequest};
use crate::error::{AppError, ErrorInfo};
use crate::utils::url_normalizer::{extract_hostname, validate_absolute_url};

/// Title stored when the page exposes none.
pub const DEFAULT_TITLE: &str = "No Title";

/// Description stored when the page exposes none.
pub const DEFAULT_DESCRIPTION: &str = "No description available.";

/// Preview summary used when summarization fails and the page has no description.
pub const PREVIEW_SUMMARY_UNAVAILABLE: &str = "Unable to generate a summary.";

/// Error recorded on links found stuck in `processing` at startup.
pub const INTERRUPTED_ERROR: &str = "Processing interrupted before completion";

/// Scrape-and-summarize result for a URL that is not stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkPreview {
    pub url: String,
    pub title: String,
    pub description: String,
    pub summary: String,
}

/// Outcome of processing one link inside a batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkProcessingResult {
    pub success: bool,
    /// The link as last persisted: completed on success, failed otherwise.
    pub link: Option<Link>,
    pub error: Option<ErrorInfo>,
    pub classification: Option<ContentClassification>,
}

/// Aggregate counts over every stored link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStatistics {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_tag: BTreeMap<String, usize>,
}

/// Composes repository, scraper, classifier and summarizer.
///
/// Every operation loads the current snapshot, applies a transition and
/// saves the result. Failures during enrichment are persisted on the link
/// and then returned to the caller.
pub struct LinkOrchestrator {
    repository: Arc<dyn LinkRepository>,
    scraper: Arc<dyn ContentScraper>,
    summarizer: Arc<dyn Summarizer>,
    classifier: ContentClassifier,
    create_lock: Mutex<()>,
}

impl LinkOrchestrator {
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        scraper: Arc<dyn ContentScraper>,
        summarizer: Arc<dyn Summarizer>,
        classifier: ContentClassifier,
    ) -> Self {
        Self {
            repository,
            scraper,
            summarizer,
            classifier,
            create_lock: Mutex::new(()),
        }
    }

    /// Creates and stores a pending link.
    ///
    /// The duplicate check and the insert run under a lock held by this
    /// orchestrator, so concurrent creates of one URL within the process
    /// store it once. Writers outside this orchestrator (another process on
    /// the same file) are not covered.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if `url` is not an absolute URI
    /// - [`AppError::Conflict`] if a link with the same URL is already stored
    pub async fn create_link<I, S>(&self, url: &str, tags: I) -> Result<Link, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let link = Link::create(url, tags)?;
        let _guard = self.create_lock.lock().await;

        if self.repository.exists(link.url()).await? {
            return Err(AppError::conflict(
                "Link already exists",
                json!({ "url": link.url() }),
            ));
        }

        let saved = self.repository.save(link).await?;
        info!(link_id = %saved.id(), url = %saved.url(), "Link created");
        Ok(saved)
    }

    /// Scrapes, classifies and summarizes a pending link.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for an unknown id
    /// - [`AppError::InvalidState`] if the link is not pending
    /// - [`AppError::Scrape`] / [`AppError::Summarize`] after the link has
    ///   been saved as failed
    pub async fn process_link(&self, id: &str) -> Result<Link, AppError> {
        self.process_link_classified(id).await.map(|(link, _)| link)
    }

    /// Same as [`Self::process_link`] but also returns the classification
    /// that decided how the summary was produced.
    pub async fn process_link_classified(
        &self,
        id: &str,
    ) -> Result<(Link, ContentClassification), AppError> {
        let link = self.get_link(id).await?;

        if !link.can_be_processed() {
            return Err(AppError::invalid_state(
                "Link cannot be processed",
                json!({ "id": id, "status": link.status().as_str() }),
            ));
        }

        let processing = self.repository.save(link.start_processing()?).await?;
        info!(link_id = %id, url = %processing.url(), "Processing link");

        let outcome = match self.enrich(&processing).await {
            Ok((content, classification)) => match processing.complete_processing(content) {
                Ok(completed) => self
                    .repository
                    .save(completed)
                    .await
                    .map(|saved| (saved, classification)),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        match outcome {
            Ok((saved, classification)) => {
                info!(
                    link_id = %id,
                    content_type = %classification.content_type,
                    summarized = classification.should_summarize,
                    "Link processed"
                );
                Ok((saved, classification))
            }
            Err(e) => {
                warn!(link_id = %id, error = %e, "Link processing failed");
                let failed = processing.fail_processing(&e)?;
                if let Err(save_err) = self.repository.save(failed).await {
                    error!(link_id = %id, error = %save_err, "Failed to persist failed link");
                }
                Err(e)
            }
        }
    }

    /// Processes every pending link one after another.
    ///
    /// A failing link is recorded in its result and never aborts the batch.
    ///
    /// # Errors
    ///
    /// Only a failure to list pending links is returned.
    pub async fn process_all_pending(&self) -> Result<Vec<LinkProcessingResult>, AppError> {
        let pending = self.repository.find_by_status(LinkStatus::Pending).await?;
        info!(count = pending.len(), "Processing pending links");

        let mut results = Vec::with_capacity(pending.len());
        for link in pending {
            let result = match self.process_link_classified(link.id()).await {
                Ok((processed, classification)) => LinkProcessingResult {
                    success: true,
                    link: Some(processed),
                    error: None,
                    classification: Some(classification),
                },
                Err(e) => {
                    let latest = self.repository.find_by_id(link.id()).await.ok().flatten();
                    LinkProcessingResult {
                        success: false,
                        link: latest.or(Some(link)),
                        error: Some(e.to_error_info()),
                        classification: None,
                    }
                }
            };
            results.push(result);
        }

        Ok(results)
    }

    /// Marks every link left in `processing` as failed, in one write.
    ///
    /// A link is only `processing` while a task runs, so any found before the
    /// queue starts was cut off by a previous shutdown. Returns the links that
    /// were reset.
    pub async fn recover_interrupted(&self) -> Result<Vec<Link>, AppError> {
        let stuck = self.repository.find_by_status(LinkStatus::Processing).await?;
        if stuck.is_empty() {
            return Ok(stuck);
        }

        let failed = stuck
            .iter()
            .map(|link| link.fail_processing(INTERRUPTED_ERROR))
            .collect::<Result<Vec<_>, _>>()?;

        let saved = self.repository.save_all(failed).await?;
        warn!(count = saved.len(), "Interrupted links marked as failed");
        Ok(saved)
    }

    /// Scrapes and summarizes `url` without storing anything.
    ///
    /// The summarizer is always asked. If it fails, the page description
    /// stands in for the summary.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if `url` is not an absolute URI
    /// - [`AppError::Scrape`] if the page cannot be fetched
    pub async fn preview(&self, url: &str) -> Result<LinkPreview, AppError> {
        let url = validate_absolute_url(url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "url": url, "reason": e.to_string() }))
        })?;

        let scraped = self.scraper.scrape(&url).await?;
        let title = non_blank(scraped.title);
        let description = non_blank(scraped.description);

        let summary = match self
            .summarizer
            .summarize(&SummaryRequest {
                url: url.clone(),
                title: title.clone(),
                description: description.clone(),
            })
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                warn!(url = %url, error = %e, "Preview summary failed");
                description
                    .clone()
                    .unwrap_or_else(|| PREVIEW_SUMMARY_UNAVAILABLE.to_string())
            }
        };

        let title = title.unwrap_or_else(|| fallback_title(&url));

        Ok(LinkPreview {
            url,
            title,
            description: description.unwrap_or_default(),
            summary,
        })
    }

    /// Merges `tags` into a link's tag list.
    pub async fn add_tags_to_link<I, S>(&self, id: &str, tags: I) -> Result<Link, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let link = self.get_link(id).await?;
        self.repository.save(link.add_tags(tags)).await
    }

    /// Counts links by status and by tag in one scan.
    pub async fn get_statistics(&self) -> Result<LinkStatistics, AppError> {
        let links = self.repository.find_all().await?;

        let mut stats = LinkStatistics {
            total: links.len(),
            by_status: LinkStatus::ALL
                .iter()
                .map(|s| (s.as_str().to_string(), 0))
                .collect(),
            by_tag: BTreeMap::new(),
        };

        for link in &links {
            *stats
                .by_status
                .entry(link.status().as_str().to_string())
                .or_default() += 1;
            for tag in link.tags() {
                *stats.by_tag.entry(tag.clone()).or_default() += 1;
            }
        }

        Ok(stats)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn get_link(&self, id: &str) -> Result<Link, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    pub async fn list_links(&self, status: Option<LinkStatus>) -> Result<Vec<Link>, AppError> {
        match status {
            Some(status) => self.repository.find_by_status(status).await,
            None => self.repository.find_all().await,
        }
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn delete_link(&self, id: &str) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(AppError::not_found("Link not found", json!({ "id": id })));
        }
        info!(link_id = %id, "Link deleted");
        Ok(())
    }

    /// Resets a failed link to pending.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidState`] unless the link is failed.
    pub async fn retry_link(&self, id: &str) -> Result<Link, AppError> {
        let link = self.get_link(id).await?;
        let saved = self.repository.save(link.retry()?).await?;
        info!(link_id = %id, "Link reset for retry");
        Ok(saved)
    }

    async fn enrich(
        &self,
        link: &Link,
    ) -> Result<(ProcessedContent, ContentClassification), AppError> {
        let scraped = self.scraper.scrape(link.url()).await?;

        let title = non_blank(scraped.title);
        let description = non_blank(scraped.description);

        let classification =
            self.classifier
                .classify(link.url(), title.as_deref(), description.as_deref());

        let title = title.unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let description = description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        let summary = if classification.should_summarize {
            self.summarizer
                .summarize(&SummaryRequest {
                    url: link.url().to_string(),
                    title: Some(title.clone()),
                    description: Some(description.clone()),
                })
                .await?
        } else {
            synthesize_summary(classification.content_type, &title, &description)
        };

        Ok((
            ProcessedContent {
                title,
                description,
                image: non_blank(scraped.image),
                summary,
            },
            classification,
        ))
    }
}

/// Builds a summary from page metadata without calling a summarizer.
pub fn synthesize_summary(content_type: ContentType, title: &str, description: &str) -> String {
    let icon = match content_type {
        ContentType::SocialMedia => return format!("📱 {description}"),
        ContentType::Video => "🎥",
        ContentType::ShortContent => "🔗",
        ContentType::LongContent => "📄",
    };

    if title == description {
        format!("{icon} {title}")
    } else {
        format!("{icon} {title}\n\n{description}")
    }
}

/// Hostname without a leading `www.`, or `"Link"` for a URL without one.
fn fallback_title(url: &str) -> String {
    let host = extract_hostname(url);
    match host.strip_prefix("www.").unwrap_or(&host) {
        "" => "Link".to_string(),
        name => name.to_string(),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::domain::scraper::{MockContentScraper, ScrapedContent};
    use crate::domain::summarizer::MockSummarizer;
    use crate::infrastructure::persistence::MemoryLinkRepository;

    fn scraped(title: &str, description: &str) -> ScrapedContent {
        ScrapedContent {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            image: None,
            content: None,
        }
    }

    fn orchestrator(
        repository: Arc<dyn LinkRepository>,
        scraper: MockContentScraper,
        summarizer: MockSummarizer,
    ) -> LinkOrchestrator {
        LinkOrchestrator::new(
            repository,
            Arc::new(scraper),
            Arc::new(summarizer),
            ContentClassifier::default(),
        )
    }

    #[tokio::test]
    async fn test_end_to_end_long_content_is_summarized() {
        let repo: Arc<dyn LinkRepository> = Arc::new(MemoryLinkRepository::new());

        let mut scraper = MockContentScraper::new();
        scraper
            .expect_scrape()
            .withf(|url| url == "https://blog.example/post-1")
            .times(1)
            .returning(|_| Ok(scraped("Post", &"A".repeat(250))));

        let mut summarizer = MockSummarizer::new();
        summarizer
            .expect_summarize()
            .withf(|req| req.title.as_deref() == Some("Post"))
            .times(1)
            .returning(|_| Ok("S".to_string()));

        let service = orchestrator(repo.clone(), scraper, summarizer);

        let created = service
            .create_link("https://blog.example/post-1", Vec::<String>::new())
            .await
            .unwrap();
        assert_eq!(created.status(), LinkStatus::Pending);

        let (processed, classification) =
            service.process_link_classified(created.id()).await.unwrap();

        assert_eq!(classification.content_type, ContentType::LongContent);
        assert!(classification.should_summarize);
        assert_eq!(processed.status(), LinkStatus::Completed);
        assert_eq!(processed.title(), Some("Post"));
        assert_eq!(processed.summary(), Some("S"));
        assert!(processed.processed_at().is_some());

        let stored = repo.find_by_id(created.id()).await.unwrap().unwrap();
        assert_eq!(stored, processed);
    }

    #[tokio::test]
    async fn test_short_content_synthesizes_summary() {
        let repo: Arc<dyn LinkRepository> = Arc::new(MemoryLinkRepository::new());

        let mut scraper = MockContentScraper::new();
        scraper
            .expect_scrape()
            .returning(|_| Ok(scraped("Tiny", "A short page")));

        let mut summarizer = MockSummarizer::new();
        summarizer.expect_summarize().times(0);

        let service = orchestrator(repo, scraper, summarizer);
        let created = service
            .create_link("https://example.com", ["rust"])
            .await
            .unwrap();

        let processed = service.process_link(created.id()).await.unwrap();

        assert_eq!(processed.summary(), Some("🔗 Tiny\n\nA short page"));
    }

    #[tokio::test]
    async fn test_missing_metadata_uses_defaults() {
        let repo: Arc<dyn LinkRepository> = Arc::new(MemoryLinkRepository::new());

        let mut scraper = MockContentScraper::new();
        scraper
            .expect_scrape()
            .returning(|_| Ok(ScrapedContent::default()));

        let service = orchestrator(repo, scraper, MockSummarizer::new());
        let created = service
            .create_link("https://x.com/someone/status/1", Vec::<String>::new())
            .await
            .unwrap();

        let processed = service.process_link(created.id()).await.unwrap();

        assert_eq!(processed.title(), Some(DEFAULT_TITLE));
        assert_eq!(processed.description(), Some(DEFAULT_DESCRIPTION));
        assert_eq!(
            processed.summary(),
            Some(format!("📱 {DEFAULT_DESCRIPTION}").as_str())
        );
    }

    #[tokio::test]
    async fn test_scrape_failure_marks_failed_and_returns_error() {
        let repo: Arc<dyn LinkRepository> = Arc::new(MemoryLinkRepository::new());

        let mut scraper = MockContentScraper::new();
        scraper
            .expect_scrape()
            .times(1)
            .returning(|_| Err(AppError::scrape("HTTP 503", json!({}))));

        let service = orchestrator(repo.clone(), scraper, MockSummarizer::new());
        let created = service
            .create_link("https://example.com", Vec::<String>::new())
            .await
            .unwrap();

        let err = service.process_link(created.id()).await.unwrap_err();
        assert!(matches!(err, AppError::Scrape { .. }));

        let stored = repo.find_by_id(created.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), LinkStatus::Failed);
        assert_eq!(stored.error(), Some("HTTP 503"));
    }

    #[tokio::test]
    async fn test_summarize_failure_marks_failed() {
        let repo: Arc<dyn LinkRepository> = Arc::new(MemoryLinkRepository::new());

        let mut scraper = MockContentScraper::new();
        scraper
            .expect_scrape()
            .returning(|_| Ok(scraped("Post", &"B".repeat(300))));

        let mut summarizer = MockSummarizer::new();
        summarizer
            .expect_summarize()
            .returning(|_| Err(AppError::summarize("rate limited", json!({}))));

        let service = orchestrator(repo.clone(), scraper, summarizer);
        let created = service
            .create_link("https://example.com/long", Vec::<String>::new())
            .await
            .unwrap();

        let err = service.process_link(created.id()).await.unwrap_err();
        assert!(matches!(err, AppError::Summarize { .. }));

        let stored = repo.find_by_id(created.id()).await.unwrap().unwrap();
        assert!(stored.is_failed());
    }

    #[tokio::test]
    async fn test_process_non_pending_is_invalid_state() {
        let repo: Arc<dyn LinkRepository> = Arc::new(MemoryLinkRepository::new());

        let mut scraper = MockContentScraper::new();
        scraper
            .expect_scrape()
            .times(1)
            .returning(|_| Ok(scraped("T", "D")));

        let service = orchestrator(repo, scraper, MockSummarizer::new());
        let created = service
            .create_link("https://example.com", Vec::<String>::new())
            .await
            .unwrap();
        service.process_link(created.id()).await.unwrap();

        let err = service.process_link(created.id()).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_process_unknown_id_is_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));
        repo.expect_save().times(0);

        let service = orchestrator(Arc::new(repo), MockContentScraper::new(), MockSummarizer::new());

        let err = service.process_link("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_create_duplicate_url_conflicts() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists()
            .withf(|url| url == "https://example.com")
            .times(1)
            .returning(|_| Ok(true));
        repo.expect_save().times(0);

        let service = orchestrator(Arc::new(repo), MockContentScraper::new(), MockSummarizer::new());

        let err = service
            .create_link("https://example.com", Vec::<String>::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_create_invalid_url_is_validation_error() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists().times(0);

        let service = orchestrator(Arc::new(repo), MockContentScraper::new(), MockSummarizer::new());

        for input in ["", "not a url", "/relative/path", "example.com"] {
            let err = service
                .create_link(input, Vec::<String>::new())
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation { .. }), "{input}");
        }
    }

    #[tokio::test]
    async fn test_batch_isolates_failures() {
        let repo: Arc<dyn LinkRepository> = Arc::new(MemoryLinkRepository::new());

        let mut scraper = MockContentScraper::new();
        scraper.expect_scrape().times(3).returning(|url| {
            if url.ends_with("/2") {
                Err(AppError::scrape("connection reset", json!({ "url": url })))
            } else {
                Ok(scraped("Title", "Description"))
            }
        });

        let service = orchestrator(repo, scraper, MockSummarizer::new());
        for i in 1..=3 {
            service
                .create_link(&format!("https://example.com/{i}"), Vec::<String>::new())
                .await
                .unwrap();
        }

        let results = service.process_all_pending().await.unwrap();

        assert_eq!(results.len(), 3);
        let outcomes: Vec<(bool, LinkStatus)> = results
            .iter()
            .map(|r| (r.success, r.link.as_ref().unwrap().status()))
            .collect();
        assert_eq!(
            outcomes,
            vec![
                (true, LinkStatus::Completed),
                (false, LinkStatus::Failed),
                (true, LinkStatus::Completed),
            ]
        );
        assert_eq!(results[1].error.as_ref().unwrap().code, "scrape_error");
        assert!(results[0].classification.is_some());
    }

    #[tokio::test]
    async fn test_add_tags_and_statistics() {
        let repo: Arc<dyn LinkRepository> = Arc::new(MemoryLinkRepository::new());
        let service = orchestrator(repo, MockContentScraper::new(), MockSummarizer::new());

        let a = service
            .create_link("https://a.example", ["rust", "async"])
            .await
            .unwrap();
        service
            .create_link("https://b.example", ["rust"])
            .await
            .unwrap();

        let tagged = service
            .add_tags_to_link(a.id(), ["async", "tokio"])
            .await
            .unwrap();
        assert_eq!(tagged.tags(), ["rust", "async", "tokio"]);

        let stats = service.get_statistics().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.by_status["pending"], 2);
        assert_eq!(stats.by_status["completed"], 0);
        assert_eq!(stats.by_tag["rust"], 2);
        assert_eq!(stats.by_tag["tokio"], 1);
    }

    #[tokio::test]
    async fn test_retry_and_delete() {
        let repo: Arc<dyn LinkRepository> = Arc::new(MemoryLinkRepository::new());

        let mut scraper = MockContentScraper::new();
        scraper
            .expect_scrape()
            .returning(|_| Err(AppError::scrape("timeout", json!({}))));

        let service = orchestrator(repo, scraper, MockSummarizer::new());
        let created = service
            .create_link("https://example.com", Vec::<String>::new())
            .await
            .unwrap();

        let err = service.retry_link(created.id()).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState { .. }));

        let _ = service.process_link(created.id()).await;
        let retried = service.retry_link(created.id()).await.unwrap();
        assert!(retried.can_be_processed());
        assert_eq!(retried.error(), None);

        service.delete_link(created.id()).await.unwrap();
        let err = service.delete_link(created.id()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[test]
    fn test_synthesize_summary_templates() {
        assert_eq!(
            synthesize_summary(ContentType::SocialMedia, "T", "D"),
            "📱 D"
        );
        assert_eq!(synthesize_summary(ContentType::Video, "Clip", "Clip"), "🎥 Clip");
        assert_eq!(
            synthesize_summary(ContentType::ShortContent, "T", "D"),
            "🔗 T\n\nD"
        );
        assert_eq!(
            synthesize_summary(ContentType::LongContent, "T", "D"),
            "📄 T\n\nD"
        );
    }

    #[tokio::test]
    async fn test_failed_completed_save_marks_link_failed() {
        let pending = Link::create("https://example.com", Vec::<String>::new()).unwrap();
        let stored = pending.clone();
        let saved_statuses = Arc::new(std::sync::Mutex::new(Vec::new()));
        let last_saved = Arc::new(std::sync::Mutex::new(None::<Link>));

        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        let statuses = saved_statuses.clone();
        let last = last_saved.clone();
        repo.expect_save().returning(move |link| {
            statuses.lock().unwrap().push(link.status());
            if link.status() == LinkStatus::Completed {
                return Err(AppError::storage("disk full", json!({})));
            }
            *last.lock().unwrap() = Some(link.clone());
            Ok(link)
        });

        let mut scraper = MockContentScraper::new();
        scraper
            .expect_scrape()
            .returning(|_| Ok(scraped("Title", "Short")));

        let service = orchestrator(Arc::new(repo), scraper, MockSummarizer::new());

        let err = service.process_link(pending.id()).await.unwrap_err();
        assert!(matches!(err, AppError::Storage { .. }));

        assert_eq!(
            *saved_statuses.lock().unwrap(),
            vec![LinkStatus::Processing, LinkStatus::Completed, LinkStatus::Failed]
        );
        let failed = last_saved.lock().unwrap().clone().unwrap();
        assert!(failed.is_failed());
        assert_eq!(failed.error(), Some("disk full"));
        assert!(failed.retry().is_ok());
    }

    /// Memory store whose `exists` yields before answering, so concurrent
    /// creates interleave between the check and the insert.
    struct YieldingRepository {
        inner: MemoryLinkRepository,
    }

    #[async_trait::async_trait]
    impl LinkRepository for YieldingRepository {
        async fn find_all(&self) -> Result<Vec<Link>, AppError> {
            self.inner.find_all().await
        }
        async fn find_by_id(&self, id: &str) -> Result<Option<Link>, AppError> {
            self.inner.find_by_id(id).await
        }
        async fn find_by_url(&self, url: &str) -> Result<Option<Link>, AppError> {
            self.inner.find_by_url(url).await
        }
        async fn find_by_status(&self, status: LinkStatus) -> Result<Vec<Link>, AppError> {
            self.inner.find_by_status(status).await
        }
        async fn save(&self, link: Link) -> Result<Link, AppError> {
            self.inner.save(link).await
        }
        async fn save_all(&self, links: Vec<Link>) -> Result<Vec<Link>, AppError> {
            self.inner.save_all(links).await
        }
        async fn delete(&self, id: &str) -> Result<bool, AppError> {
            self.inner.delete(id).await
        }
        async fn exists(&self, url: &str) -> Result<bool, AppError> {
            tokio::task::yield_now().await;
            self.inner.exists(url).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_creates_store_url_once() {
        let repo = Arc::new(YieldingRepository {
            inner: MemoryLinkRepository::new(),
        });
        let service = orchestrator(repo.clone(), MockContentScraper::new(), MockSummarizer::new());

        let (first, second) = tokio::join!(
            service.create_link("https://example.com/same", Vec::<String>::new()),
            service.create_link("https://example.com/same", Vec::<String>::new()),
        );

        assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);
        let err = first.err().or(second.err()).unwrap();
        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_recover_interrupted_fails_processing_links() {
        let pending = Link::create("https://a.example", Vec::<String>::new()).unwrap();
        let stuck = Link::create("https://b.example", Vec::<String>::new())
            .unwrap()
            .start_processing()
            .unwrap();
        let repo = Arc::new(MemoryLinkRepository::with_links(vec![
            pending.clone(),
            stuck.clone(),
        ]));
        let service = orchestrator(repo.clone(), MockContentScraper::new(), MockSummarizer::new());

        let recovered = service.recover_interrupted().await.unwrap();

        assert_eq!(recovered.len(), 1);
        assert_eq!(recovered[0].id(), stuck.id());
        let stored = repo.find_by_id(stuck.id()).await.unwrap().unwrap();
        assert!(stored.is_failed());
        assert_eq!(stored.error(), Some(INTERRUPTED_ERROR));
        let untouched = repo.find_by_id(pending.id()).await.unwrap().unwrap();
        assert_eq!(untouched.status(), LinkStatus::Pending);

        assert!(service.recover_interrupted().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_preview_falls_back_to_description() {
        let mut scraper = MockContentScraper::new();
        scraper
            .expect_scrape()
            .times(1)
            .returning(|_| Ok(scraped("Post", "Page description")));

        let mut summarizer = MockSummarizer::new();
        summarizer
            .expect_summarize()
            .times(1)
            .returning(|_| Err(AppError::summarize("Claude API error (529)", json!({}))));

        // No expectations: any repository call panics.
        let repo = MockLinkRepository::new();
        let service = orchestrator(Arc::new(repo), scraper, summarizer);

        let preview = service.preview("https://example.com/post").await.unwrap();

        assert_eq!(
            preview,
            LinkPreview {
                url: "https://example.com/post".to_string(),
                title: "Post".to_string(),
                description: "Page description".to_string(),
                summary: "Page description".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_preview_without_metadata() {
        let mut scraper = MockContentScraper::new();
        scraper
            .expect_scrape()
            .returning(|_| Ok(ScrapedContent::default()));

        let mut summarizer = MockSummarizer::new();
        summarizer
            .expect_summarize()
            .returning(|_| Err(AppError::summarize("down", json!({}))));

        let service = orchestrator(Arc::new(MockLinkRepository::new()), scraper, summarizer);

        let preview = service.preview("https://www.example.com/x").await.unwrap();

        assert_eq!(preview.title, "example.com");
        assert_eq!(preview.description, "");
        assert_eq!(preview.summary, PREVIEW_SUMMARY_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_preview_rejects_relative_url() {
        let mut scraper = MockContentScraper::new();
        scraper.expect_scrape().times(0);

        let service = orchestrator(
            Arc::new(MockLinkRepository::new()),
            scraper,
            MockSummarizer::new(),
        );

        let err = service.preview("example.com").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}
