//! Web page scraping.

mod metadata;
pub mod web_scraper;

pub use metadata::{PageMetadata, extract_metadata};
pub use web_scraper::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, WebContentScraper};
