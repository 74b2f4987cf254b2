//! Utility functions shared across layers.
//!
//! - [`id_generator`] - Link identifier generation
//! - [`url_normalizer`] - URL validation and hostname extraction
//! - [`text`] - Character-aware truncation helpers

pub mod id_generator;
pub mod text;
pub mod url_normalizer;
