//! HTTP server initialization and runtime setup.
//!
//! Handles storage setup, collaborator wiring, the startup batch and the
//! Axum server lifecycle.

use crate::application::services::{LinkManagementService, LinkOrchestrator};
use crate::config::Config;
use crate::domain::classifier::ContentClassifier;
use crate::domain::repositories::LinkRepository;
use crate::domain::summarizer::Summarizer;
use crate::infrastructure::notification::DiscordNotifier;
use crate::infrastructure::persistence::FileLinkRepository;
use crate::infrastructure::scraper::WebContentScraper;
use crate::infrastructure::summarizer::{ClaudeSummarizer, FallbackSummarizer};
use crate::queue::LocalBackgroundRunner;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Delay before the startup batch is queued, so the listener is up first.
pub const STARTUP_BATCH_DELAY: Duration = Duration::from_secs(1);

/// Builds application state backed by the `links.json` store under
/// `config.data_path`.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or a
/// collaborator fails to initialize.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let repository = FileLinkRepository::open(&config.data_path)
        .await
        .context("Failed to open link storage")?;

    build_state_with_repository(config, Arc::new(repository))
}

/// Wires every collaborator around an existing repository.
///
/// - Claude summarizer when an API key is configured, otherwise the
///   template fallback
/// - Discord notifier over the configured webhooks
/// - One in-process background runner
///
/// # Errors
///
/// Returns an error if an HTTP client cannot be built.
pub fn build_state_with_repository(
    config: &Config,
    repository: Arc<dyn LinkRepository>,
) -> Result<AppState> {
    let scraper = WebContentScraper::new(config.scraper_timeout(), &config.scraper_user_agent)
        .context("Failed to initialize scraper")?;

    let summarizer: Arc<dyn Summarizer> = match &config.anthropic_api_key {
        Some(key) => {
            tracing::info!(model = %config.ai_model, "Summarizer: Claude");
            Arc::new(
                ClaudeSummarizer::new(key, &config.ai_model)
                    .context("Failed to initialize summarizer")?,
            )
        }
        None => {
            tracing::info!("Summarizer: fallback templates");
            Arc::new(FallbackSummarizer::new())
        }
    };

    let notifier = DiscordNotifier::new(config.discord_webhooks.clone());
    tracing::info!(webhooks = notifier.webhook_count(), "Notifier: Discord");

    let orchestrator = LinkOrchestrator::new(
        repository.clone(),
        Arc::new(scraper),
        summarizer,
        ContentClassifier::new(config.summary_threshold),
    );

    let runner = Arc::new(LocalBackgroundRunner::new(config.queue_poll_interval()));

    let link_service = LinkManagementService::new(
        Arc::new(orchestrator),
        runner.clone(),
        Arc::new(notifier),
    );

    Ok(AppState::new(Arc::new(link_service), repository, runner))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - JSON file storage
/// - Scraper, summarizer and notifier
/// - Background task runner
/// - Recovery of links left `processing` by an earlier run, then a delayed
///   batch over leftover pending links
/// - Axum HTTP server with graceful shutdown on Ctrl-C
///
/// After the server stops accepting requests, the queue finishes the task in
/// flight and exits; tasks still queued are dropped.
///
/// # Errors
///
/// Returns an error if:
/// - Storage initialization fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config).await?;

    state.link_service.recover_interrupted().await?;

    if config.process_pending_on_startup {
        state
            .runner
            .schedule_delayed(state.link_service.pending_batch_task(), STARTUP_BATCH_DELAY);
        tracing::info!(delay = ?STARTUP_BATCH_DELAY, "Startup batch scheduled");
    }

    let app = app_router(state.clone());

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!(
        pending = state.runner.processor().pending_count(),
        "Server stopped; draining in-flight task"
    );
    state.runner.stop().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
