//! Link repository implementations.
//!
//! Both implementations share the `{ links, lastUpdated }` document layout.
//!
//! # Repositories
//!
//! - [`FileLinkRepository`] - Single JSON file with atomic replace
//! - [`MemoryLinkRepository`] - In-process storage for tests and ephemeral runs

mod document;
pub mod file_link_repository;
pub mod memory_link_repository;

pub use document::LinkDocument;
pub use file_link_repository::{FileLinkRepository, LINKS_FILE};
pub use memory_link_repository::MemoryLinkRepository;
