//! URL validation and hostname extraction.
//!
//! Links are stored exactly as submitted (trimmed); this module only checks
//! that the input is an absolute URI and pulls out the pieces the classifier
//! needs.

use url::Url;

/// Errors that can occur while validating a submitted URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),
}

/// Validates that `input` is an absolute URI and returns its trimmed form.
///
/// Relative references (`/path`, `example.com`) are rejected because they
/// carry no scheme.
///
/// # Errors
///
/// Returns [`UrlValidationError::Empty`] for blank input and
/// [`UrlValidationError::InvalidFormat`] when the URL parser rejects it.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     validate_absolute_url("  https://example.com/a ").unwrap(),
///     "https://example.com/a"
/// );
/// assert!(validate_absolute_url("example.com").is_err());
/// ```
pub fn validate_absolute_url(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    Ok(trimmed.to_string())
}

/// Returns the lowercase hostname of `input`, or an empty string when the URL
/// is malformed or has no host.
pub fn extract_hostname(input: &str) -> String {
    Url::parse(input)
        .ok()
        .and_then(|url| url.host_str().map(|h| h.to_ascii_lowercase()))
        .unwrap_or_default()
}
