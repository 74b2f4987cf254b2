//! Summarizer backends.
//!
//! - [`ClaudeSummarizer`] - Anthropic Messages API, used when an API key is set
//! - [`FallbackSummarizer`] - Template-based, no network

pub mod claude;
pub mod fallback;

pub use claude::{ClaudeSummarizer, DEFAULT_MODEL};
pub use fallback::{FallbackSummarizer, fallback_summary};
