//! Character-aware truncation helpers.
//!
//! All limits count Unicode scalar values, never bytes, so multi-byte text is
//! never split inside a character.

/// Marker appended to text that was cut short.
pub const ELLIPSIS: &str = "...";

/// Truncates `text` to at most `max_chars` characters.
///
/// When truncation happens the result ends with [`ELLIPSIS`] and its total
/// length is exactly `max_chars`.
///
/// The marker is only kept when `max_chars` is larger than the marker itself
/// (more than 3). Callers that must always show the marker need a limit above
/// that; smaller limits cut the text bare.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_with_ellipsis("hello world", 8), "hello...");
/// assert_eq!(truncate_with_ellipsis("short", 10), "short");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let marker_len = ELLIPSIS.chars().count();
    if max_chars <= marker_len {
        return text.chars().take(max_chars).collect();
    }

    let mut out: String = text.chars().take(max_chars - marker_len).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Truncates `text` to at most `max_chars` characters without a marker.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("exact", 5), "exact");
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        let out = truncate_with_ellipsis("hello world", 8);
        assert_eq!(out, "hello...");
        assert_eq!(out.chars().count(), 8);
    }

    #[test]
    fn test_truncate_multibyte() {
        let text = "한국어 텍스트입니다";
        let out = truncate_with_ellipsis(text, 6);
        assert_eq!(out, "한국어...");
    }

    #[test]
    fn test_truncate_tiny_limit() {
        assert_eq!(truncate_with_ellipsis("abcdef", 2), "ab");
        assert_eq!(truncate_with_ellipsis("abcdef", 3), "abc");
    }

    #[test]
    fn test_truncate_keeps_marker_just_above_its_length() {
        assert_eq!(truncate_with_ellipsis("abcdef", 4), "a...");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ab", 3), "ab");
    }
}
