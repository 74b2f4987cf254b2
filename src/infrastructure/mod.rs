//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for persistence, scraping, summarization and
//! notification.
//!
//! # Modules
//!
//! - [`persistence`] - JSON file and in-memory link repositories
//! - [`scraper`] - HTTP page fetching and metadata extraction
//! - [`summarizer`] - Claude and template-based summarizers
//! - [`notification`] - Discord webhook delivery

pub mod notification;
pub mod persistence;
pub mod scraper;
pub mod summarizer;
