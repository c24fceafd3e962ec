//! Text shaping shared by every output format.

/// Maximum number of characters of a summary kept in rendered output.
pub const SUMMARY_MAX_CHARS: usize = 300;

/// Marker appended to truncated summaries.
pub const ELLIPSIS: &str = "...";

/// Truncate a summary to [`SUMMARY_MAX_CHARS`] characters.
///
/// Counts Unicode scalar values, not bytes, so multi-byte text is never cut
/// inside a character. Text at or under the limit is returned unchanged.
///
/// # Examples
///
/// ```
/// use arxiv_tracker::utils::truncate_summary;
///
/// assert_eq!(truncate_summary("short"), "short");
/// assert_eq!(truncate_summary(&"a".repeat(301)).chars().count(), 303);
/// ```
pub fn truncate_summary(text: &str) -> String {
    match text.char_indices().nth(SUMMARY_MAX_CHARS) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Collapse runs of whitespace (including the hard line breaks of Atom
/// payloads) into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_summary_short_unchanged() {
        assert_eq!(truncate_summary(""), "");
        assert_eq!(truncate_summary("Hello"), "Hello");
    }

    #[test]
    fn test_truncate_summary_exact_limit_unchanged() {
        let text = "x".repeat(SUMMARY_MAX_CHARS);
        assert_eq!(truncate_summary(&text), text);
    }

    #[test]
    fn test_truncate_summary_law() {
        for len in [301usize, 302, 500, 1000] {
            let text = "y".repeat(len);
            let out = truncate_summary(&text);
            assert_eq!(out.chars().count(), SUMMARY_MAX_CHARS + ELLIPSIS.len());
            assert!(out.ends_with(ELLIPSIS));
            assert!(text.starts_with(&out[..SUMMARY_MAX_CHARS]));
        }
    }

    #[test]
    fn test_truncate_summary_multibyte() {
        let text = "論".repeat(400);
        let out = truncate_summary(&text);
        assert_eq!(out.chars().count(), SUMMARY_MAX_CHARS + ELLIPSIS.len());
        assert!(out.starts_with("論論"));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            collapse_whitespace("  We study\n  transformers\tat scale. "),
            "We study transformers at scale."
        );
    }
}
