//! # linkdump
//!
//! A link ingestion service built with Axum. Submitted URLs are scraped for
//! page metadata, summarized when the content warrants it, stored in a JSON
//! file and announced to Discord webhooks.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Link lifecycle, classification policy and collaborator traits
//! - **Application Layer** ([`application`]) - Processing orchestration and the public service facade
//! - **Infrastructure Layer** ([`infrastructure`]) - JSON storage, scraper, summarizers, Discord
//! - **Queue** ([`queue`]) - Sequential in-process task execution
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Open Graph / Twitter card / JSON-LD metadata extraction
//! - Claude summaries for long-form content, template summaries otherwise
//! - Background processing, one task at a time, without blocking requests
//! - Discord embed notifications fanned out to every configured webhook
//!
//! ## Quick Start
//!
//! ```bash
//! export DATA_PATH="./data"
//! export ANTHROPIC_API_KEY="sk-ant-..."          # Optional
//! export DISCORD_WEBHOOKS="https://discord.com/api/webhooks/..."  # Optional
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod queue;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkManagementService, LinkOrchestrator};
    pub use crate::domain::entities::{Link, LinkStatus};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
