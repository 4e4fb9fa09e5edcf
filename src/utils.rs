//! String helpers shared by the scrapers and the Discord sink.
//!
//! - Whitespace normalization for scraped text
//! - Char-boundary-safe truncation for log previews and embed limits

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse runs of whitespace into single spaces and trim the ends.
///
/// Scraped nodes often contain indentation and line breaks from the page
/// template; titles are compared after this step.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_text("  Fed\n   raises  rates "), "Fed raises rates");
/// ```
pub fn normalize_text(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s.trim(), " ").into_owned()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Returns
///
/// The original string if it is at most `max` characters, otherwise a
/// truncated version with `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Truncate to at most `max` characters, ending with `…` when cut.
///
/// Used to keep embed text inside Discord's per-field limits.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_collapses_whitespace() {
        assert_eq!(normalize_text("  Fed\n   raises\trates "), "Fed raises rates");
        assert_eq!(normalize_text("   "), "");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        let s = "美联储新闻发布";
        let result = truncate_for_log(s, 3);
        assert!(result.starts_with("美联储"));
        assert!(result.contains("(+12 bytes)"));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdefgh", 5), "abcd…");
        assert_eq!(truncate_chars("消费者物价指数", 4), "消费者…");
        assert_eq!(truncate_chars("abcdefgh", 5).chars().count(), 5);
    }
}
