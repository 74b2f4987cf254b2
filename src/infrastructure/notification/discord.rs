//! Discord webhook notifier.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::domain::entities::Link;
use crate::domain::notifier::Notifier;
use crate::utils::text::truncate_with_ellipsis;

pub const MAX_TITLE_CHARS: usize = 256;
pub const MAX_DESCRIPTION_CHARS: usize = 4096;
pub const MAX_FIELD_CHARS: usize = 1024;
pub const MAX_FOOTER_CHARS: usize = 2048;

const EMBED_COLOR: u32 = 0x0099ff;
const FOOTER: &str = "LinkDump Bot";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub url: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub timestamp: String,
    pub footer: EmbedFooter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// Builds the embed posted for a completed link, with every text field cut
/// to Discord's limits.
pub fn build_embed(link: &Link) -> Embed {
    let tags = if link.tags().is_empty() {
        "None".to_string()
    } else {
        link.tags().join(", ")
    };

    Embed {
        title: truncate_with_ellipsis(link.title().unwrap_or("No Title"), MAX_TITLE_CHARS),
        description: truncate_with_ellipsis(
            link.summary().unwrap_or("No Summary Available"),
            MAX_DESCRIPTION_CHARS,
        ),
        url: link.url().to_string(),
        color: EMBED_COLOR,
        fields: vec![
            EmbedField {
                name: "🏷️ Tags".to_string(),
                value: truncate_with_ellipsis(&tags, MAX_FIELD_CHARS),
                inline: true,
            },
            EmbedField {
                name: "📅 Added".to_string(),
                value: link.created_at().format("%Y-%m-%d %H:%M UTC").to_string(),
                inline: true,
            },
        ],
        timestamp: link.created_at().to_rfc3339(),
        footer: EmbedFooter {
            text: truncate_with_ellipsis(FOOTER, MAX_FOOTER_CHARS),
        },
    }
}

/// Posts one embed per completed link to every configured webhook.
///
/// Webhooks are called concurrently. A failing webhook is logged and does
/// not affect the others.
pub struct DiscordNotifier {
    webhooks: Arc<[String]>,
    http: reqwest::Client,
}

impl DiscordNotifier {
    pub fn new(webhooks: Vec<String>) -> Self {
        Self {
            webhooks: webhooks.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn webhook_count(&self) -> usize {
        self.webhooks.len()
    }
}

async fn post(http: reqwest::Client, url: String, payload: Arc<WebhookPayload>) -> anyhow::Result<()> {
    let resp = http.post(&url).json(payload.as_ref()).send().await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "Discord webhook returned non-success");
        anyhow::bail!("Discord webhook returned {status}");
    }

    Ok(())
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, link: &Link) {
        if self.webhooks.is_empty() {
            warn!(link_id = %link.id(), "No Discord webhooks configured; skipping notification");
            return;
        }

        let payload = Arc::new(WebhookPayload {
            embeds: vec![build_embed(link)],
        });

        let mut set = JoinSet::new();
        for (index, url) in self.webhooks.iter().enumerate() {
            let http = self.http.clone();
            let url = url.clone();
            let payload = payload.clone();
            set.spawn(async move { (index, post(http, url, payload).await) });
        }

        let total = self.webhooks.len();
        let mut failures = 0usize;
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, Ok(()))) => debug!(webhook = index, "Discord notification delivered"),
                Ok((index, Err(e))) => {
                    failures += 1;
                    error!(webhook = index, error = %e, "Discord notification failed");
                }
                Err(e) => {
                    failures += 1;
                    error!(error = %e, "Discord notification task aborted");
                }
            }
        }

        if failures > 0 {
            error!(link_id = %link.id(), failures, total, "Some Discord notifications failed");
        }
    }
}
