//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod links;
pub mod process;
pub mod stats;

pub use health::health_handler;
pub use links::{
    add_tags_handler, create_link_handler, delete_link_handler, get_link_handler,
    list_links_handler, preview_handler, reprocess_link_handler,
};
pub use process::process_links_handler;
pub use stats::stats_handler;
