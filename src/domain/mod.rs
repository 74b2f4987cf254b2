//! Domain layer containing business entities, policies and contracts.
//!
//! The domain layer has no dependency on infrastructure or presentation. It
//! defines what a link is, how it moves through its lifecycle, and the traits
//! that concrete collaborators implement.
//!
//! # Architecture
//!
//! - [`entities`] - [`entities::Link`] state machine and classification types
//! - [`classifier`] - Pure summarization policy
//! - [`repositories`] - Storage trait definitions
//! - [`scraper`], [`summarizer`], [`notifier`] - External collaborator contracts
//!
//! # Processing Flow
//!
//! 1. A link is created `pending` and saved
//! 2. A task on [`crate::queue`] picks it up and marks it `processing`
//! 3. [`scraper::ContentScraper`] fetches metadata
//! 4. [`classifier::ContentClassifier`] decides whether to call [`summarizer::Summarizer`]
//! 5. The link is saved `completed` (or `failed`) and [`notifier::Notifier`] fans it out

pub mod classifier;
pub mod entities;
pub mod notifier;
pub mod repositories;
pub mod scraper;
pub mod summarizer;
