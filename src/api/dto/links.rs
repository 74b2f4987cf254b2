//! DTOs for link endpoints.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::Link;

pub const MAX_URL_LENGTH: u64 = 2048;
pub const MAX_TAGS: u64 = 32;
pub const MAX_TAG_LENGTH: usize = 64;

/// Request to add a link.
///
/// URL syntax is checked by the domain, which reports a validation error for
/// anything that is not an absolute URI.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,

    #[validate(length(max = 32), custom(function = "validate_tags"))]
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Request to merge tags into a link.
#[derive(Debug, Deserialize, Validate)]
pub struct AddTagsRequest {
    #[validate(length(min = 1, max = 32), custom(function = "validate_tags"))]
    pub tags: Vec<String>,
}

/// Request to preview a URL without storing it.
#[derive(Debug, Deserialize, Validate)]
pub struct PreviewRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,
}

/// Query string for `GET /api/links`.
#[derive(Debug, Default, Deserialize)]
pub struct ListLinksQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub links: Vec<Link>,
}

fn validate_tags(tags: &Vec<String>) -> Result<(), ValidationError> {
    for tag in tags {
        let len = tag.trim().chars().count();
        if len == 0 || len > MAX_TAG_LENGTH {
            let mut err = ValidationError::new("tag_length");
            err.message = Some(format!("Each tag must be 1-{MAX_TAG_LENGTH} characters").into());
            return Err(err);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let ok = CreateLinkRequest {
            url: "https://example.com".into(),
            tags: Some(vec!["rust".into()]),
        };
        assert!(ok.validate().is_ok());

        let empty_url = CreateLinkRequest {
            url: String::new(),
            tags: None,
        };
        assert!(empty_url.validate().is_err());

        let long_url = CreateLinkRequest {
            url: format!("https://example.com/{}", "a".repeat(2048)),
            tags: None,
        };
        assert!(long_url.validate().is_err());
    }

    #[test]
    fn test_tag_rules() {
        let blank_tag = CreateLinkRequest {
            url: "https://example.com".into(),
            tags: Some(vec!["  ".into()]),
        };
        assert!(blank_tag.validate().is_err());

        let long_tag = AddTagsRequest {
            tags: vec!["t".repeat(65)],
        };
        assert!(long_tag.validate().is_err());

        let too_many = AddTagsRequest {
            tags: (0..33).map(|i| format!("tag{i}")).collect(),
        };
        assert!(too_many.validate().is_err());

        let none = AddTagsRequest { tags: Vec::new() };
        assert!(none.validate().is_err());
    }

    #[test]
    fn test_create_request_tags_default() {
        let req: CreateLinkRequest = serde_json::from_str(r#"{"url":"https://example.com"}"#).unwrap();
        assert!(req.tags.is_none());
        assert!(req.validate().is_ok());
    }
}
