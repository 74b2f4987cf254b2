//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Example
//!
//! ```bash
//! export LISTEN="0.0.0.0:3000"
//! export DATA_PATH="./data"
//! export DISCORD_WEBHOOKS="https://discord.com/api/webhooks/1/abc,https://discord.com/api/webhooks/2/def"
//! export ANTHROPIC_API_KEY="sk-ant-..."
//! ```
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `DATA_PATH` - Directory holding `links.json` (default: `./data`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `DISCORD_WEBHOOKS` - Comma-separated webhook URLs (default: none)
//! - `SCRAPER_TIMEOUT_MS` - Page fetch timeout (default: 10000, max: 120000)
//! - `SCRAPER_USER_AGENT` - User agent for page fetches (default: `LinkDump Bot 1.0`)
//! - `SUMMARY_THRESHOLD` - Metadata length that triggers AI summaries (default: 200)
//! - `ANTHROPIC_API_KEY` - Enables the Claude summarizer when set
//! - `AI_MODEL` - Claude model (default: `claude-3-haiku-20240307`)
//! - `QUEUE_POLL_INTERVAL_MS` - Queue idle polling interval (default: 100)
//! - `PROCESS_PENDING_ON_STARTUP` - Process leftover pending links at boot (default: true)

use anyhow::Result;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::classifier::DEFAULT_SUMMARY_THRESHOLD;
use crate::infrastructure::scraper::DEFAULT_USER_AGENT;
use crate::infrastructure::summarizer::DEFAULT_MODEL;

const MAX_SCRAPER_TIMEOUT_MS: u64 = 120_000;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub data_path: PathBuf,
    pub log_level: String,
    pub log_format: String,
    pub discord_webhooks: Vec<String>,
    pub scraper_timeout_ms: u64,
    pub scraper_user_agent: String,
    pub summary_threshold: usize,
    /// Claude summarization is used only when this is set and non-empty.
    pub anthropic_api_key: Option<String>,
    pub ai_model: String,
    pub queue_poll_interval_ms: u64,
    pub process_pending_on_startup: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            data_path: PathBuf::from("./data"),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            discord_webhooks: Vec::new(),
            scraper_timeout_ms: 10_000,
            scraper_user_agent: DEFAULT_USER_AGENT.to_string(),
            summary_threshold: DEFAULT_SUMMARY_THRESHOLD,
            anthropic_api_key: None,
            ai_model: DEFAULT_MODEL.to_string(),
            queue_poll_interval_ms: 100,
            process_pending_on_startup: true,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Unset or unparsable numeric values fall back to their defaults.
    ///
    /// # Errors
    ///
    /// None at present. Range checks live in [`Config::validate`].
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let listen_addr = env::var("LISTEN").unwrap_or(defaults.listen_addr);
        let data_path = env::var("DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);
        let log_level = env::var("RUST_LOG").unwrap_or(defaults.log_level);
        let log_format = env::var("LOG_FORMAT").unwrap_or(defaults.log_format);

        let discord_webhooks = env::var("DISCORD_WEBHOOKS")
            .map(|v| parse_list(&v))
            .unwrap_or_default();

        let scraper_timeout_ms = parse_var("SCRAPER_TIMEOUT_MS", defaults.scraper_timeout_ms);
        let scraper_user_agent =
            env::var("SCRAPER_USER_AGENT").unwrap_or(defaults.scraper_user_agent);
        let summary_threshold = parse_var("SUMMARY_THRESHOLD", defaults.summary_threshold);

        let anthropic_api_key = env::var("ANTHROPIC_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        let ai_model = env::var("AI_MODEL").unwrap_or(defaults.ai_model);

        let queue_poll_interval_ms =
            parse_var("QUEUE_POLL_INTERVAL_MS", defaults.queue_poll_interval_ms);

        let process_pending_on_startup = env::var("PROCESS_PENDING_ON_STARTUP")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(defaults.process_pending_on_startup);

        Ok(Self {
            listen_addr,
            data_path,
            log_level,
            log_format,
            discord_webhooks,
            scraper_timeout_ms,
            scraper_user_agent,
            summary_threshold,
            anthropic_api_key,
            ai_model,
            queue_poll_interval_ms,
            process_pending_on_startup,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `summary_threshold` is 0
    /// - `scraper_timeout_ms` is outside 1..=120000
    /// - `queue_poll_interval_ms` is 0
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - a webhook URL is not http(s)
    pub fn validate(&self) -> Result<()> {
        if self.summary_threshold == 0 {
            anyhow::bail!("SUMMARY_THRESHOLD must be greater than 0");
        }

        if self.scraper_timeout_ms == 0 || self.scraper_timeout_ms > MAX_SCRAPER_TIMEOUT_MS {
            anyhow::bail!(
                "SCRAPER_TIMEOUT_MS must be between 1 and {}, got {}",
                MAX_SCRAPER_TIMEOUT_MS,
                self.scraper_timeout_ms
            );
        }

        if self.queue_poll_interval_ms == 0 {
            anyhow::bail!("QUEUE_POLL_INTERVAL_MS must be greater than 0");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        for webhook in &self.discord_webhooks {
            if !webhook.starts_with("https://") && !webhook.starts_with("http://") {
                anyhow::bail!(
                    "DISCORD_WEBHOOKS entries must start with 'https://' or 'http://', got '{}'",
                    mask_webhook_url(webhook)
                );
            }
        }

        Ok(())
    }

    pub fn scraper_timeout(&self) -> Duration {
        Duration::from_millis(self.scraper_timeout_ms)
    }

    pub fn queue_poll_interval(&self) -> Duration {
        Duration::from_millis(self.queue_poll_interval_ms)
    }

    /// Returns whether the Claude summarizer will be used.
    pub fn is_ai_enabled(&self) -> bool {
        self.anthropic_api_key.is_some()
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Data path: {}", self.data_path.display());
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);

        if self.discord_webhooks.is_empty() {
            tracing::info!("  Discord webhooks: none");
        } else {
            for webhook in &self.discord_webhooks {
                tracing::info!("  Discord webhook: {}", mask_webhook_url(webhook));
            }
        }

        if self.is_ai_enabled() {
            tracing::info!("  Summarizer: Claude ({})", self.ai_model);
        } else {
            tracing::info!("  Summarizer: fallback (ANTHROPIC_API_KEY not set)");
        }

        tracing::info!("  Summary threshold: {} chars", self.summary_threshold);
        tracing::info!("  Scraper timeout: {} ms", self.scraper_timeout_ms);
        tracing::info!("  Process pending on startup: {}", self.process_pending_on_startup);
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Masks the secret token of a webhook URL for logging.
///
/// - `https://discord.com/api/webhooks/123/token` → `https://discord.com/api/webhooks/123/***`
fn mask_webhook_url(url: &str) -> String {
    let path_start = url.find("://").map_or(0, |i| i + 3);

    match url[path_start..].rfind('/') {
        Some(pos) if path_start + pos + 1 < url.len() => {
            format!("{}/***", &url[..path_start + pos])
        }
        _ => url.to_string(),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
