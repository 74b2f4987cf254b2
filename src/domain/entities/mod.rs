//! Core domain entities.
//!
//! - [`Link`] - A submitted URL and its processing lifecycle
//! - [`ContentClassification`] - Per-call summarization decision
//!
//! `Link` is an immutable snapshot: transitions return new values instead of
//! mutating, which keeps concurrent readers consistent without locks.

pub mod classification;
pub mod link;

pub use classification::{ContentClassification, ContentType};
pub use link::{Link, LinkStatus, ProcessedContent};
