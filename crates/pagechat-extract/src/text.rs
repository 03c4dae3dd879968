//! Text normalization and truncation for extracted page text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::{MAX_CONTENT_CHARS, TRUNCATION_MARKER};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static EXCESS_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n\s*\n").unwrap());

/// Normalize raw element text.
///
/// Whitespace runs become one space, 3+ line breaks become a single blank
/// line, the ends are trimmed and tabs become spaces.
pub fn clean_text(raw: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(raw, " ");
    let collapsed = EXCESS_BLANK_LINES.replace_all(&collapsed, "\n\n");
    collapsed.trim().replace('\t', " ")
}

/// Cut `content` to [`MAX_CONTENT_CHARS`] characters, appending the marker
/// when anything was dropped.
pub fn truncate_content(content: String) -> String {
    match content.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((cut, _)) => {
            let mut truncated = content[..cut].to_string();
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        }
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_collapses_whitespace() {
        assert_eq!(clean_text("  hello \n\n\n\t world  "), "hello world");
        assert_eq!(clean_text("a\tb"), "a b");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_truncate_at_limit() {
        let exact = "x".repeat(MAX_CONTENT_CHARS);
        assert_eq!(truncate_content(exact.clone()), exact);

        let over = "y".repeat(MAX_CONTENT_CHARS + 1);
        let truncated = truncate_content(over);
        assert!(truncated.ends_with(TRUNCATION_MARKER));
        assert_eq!(
            truncated.chars().count(),
            MAX_CONTENT_CHARS + TRUNCATION_MARKER.chars().count()
        );
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let accented = "è".repeat(MAX_CONTENT_CHARS);
        assert_eq!(truncate_content(accented.clone()), accented);
    }
}
