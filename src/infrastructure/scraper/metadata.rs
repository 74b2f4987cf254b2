//! Page metadata extraction from HTML.

use scraper::{Html, Selector};
use serde_json::Value;

/// Metadata picked from a document, each field chosen by priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Extracts title, description and image from `html`.
///
/// Sources are tried in order and the first non-blank value wins:
///
/// | Field | Order |
/// |---|---|
/// | title | `og:title`, `twitter:title`, JSON-LD `name`/`headline`, `<title>` |
/// | description | `og:description`, `twitter:description`, JSON-LD `description`, `meta[name=description]` |
/// | image | `og:image`, `twitter:image`, JSON-LD `image` |
///
/// # Examples
///
/// ```ignore
/// let html = r#"<head><meta property="og:title" content="Example"></head>"#;
/// assert_eq!(extract_metadata(html).title.as_deref(), Some("Example"));
/// ```
pub fn extract_metadata(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);
    let json_ld = first_json_ld(&document);

    let ld = |key: &str| json_ld.as_ref().and_then(|v| ld_string(v.get(key)?));

    let title = first_present([
        meta_content(&document, r#"meta[property="og:title"]"#),
        meta_content(&document, r#"meta[name="twitter:title"]"#),
        ld("name").or_else(|| ld("headline")),
        element_text(&document, "title"),
    ]);

    let description = first_present([
        meta_content(&document, r#"meta[property="og:description"]"#),
        meta_content(&document, r#"meta[name="twitter:description"]"#),
        ld("description"),
        meta_content(&document, r#"meta[name="description"]"#),
    ]);

    let image = first_present([
        meta_content(&document, r#"meta[property="og:image"]"#),
        meta_content(&document, r#"meta[name="twitter:image"]"#),
        ld("image"),
    ]);

    PageMetadata {
        title,
        description,
        image,
    }
}

fn first_present<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

fn meta_content(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|c| !c.is_empty())
        .map(str::to_string)
}

fn element_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    let text: String = document.select(&selector).next()?.text().collect();
    Some(text)
}

fn first_json_ld(document: &Html) -> Option<Value> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;
    let raw: String = document.select(&selector).next()?.text().collect();

    match serde_json::from_str::<Value>(&raw).ok()? {
        Value::Array(items) => items.into_iter().next(),
        value => Some(value),
    }
}

/// JSON-LD values may be a plain string, an `ImageObject`-like map with a
/// `url`, or a list of either.
fn ld_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("url").and_then(ld_string),
        Value::Array(items) => items.iter().find_map(ld_string),
        _ => None,
    }
}
