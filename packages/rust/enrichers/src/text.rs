//! Small text helpers shared by the enrichers.

use std::sync::LazyLock;

use regex::Regex;

/// Remove HTML tags, keeping their text content.
pub(crate) fn strip_tags(s: &str) -> String {
    static TAG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
    TAG_RE.replace_all(s, "").into_owned()
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `s` to at most `max_chars` characters, backing off to the last word
/// boundary when the cut would split a word.
pub(crate) fn truncate_words(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }

    let cut: String = s.chars().take(max_chars).collect();
    let next_is_space = s.chars().nth(max_chars).is_some_and(char::is_whitespace);
    if next_is_space {
        return cut.trim_end().to_string();
    }

    match cut.rfind(char::is_whitespace) {
        Some(idx) => cut[..idx].trim_end().to_string(),
        None => cut,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_nested_tags() {
        assert_eq!(strip_tags("a <em>b <b>c</b></em> d"), "a b c d");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
    }

    #[test]
    fn truncates_on_word_boundary() {
        assert_eq!(truncate_words("hello brave new world", 13), "hello brave");
        assert_eq!(truncate_words("hello brave new world", 11), "hello brave");
        assert_eq!(truncate_words("short", 10), "short");
        assert_eq!(truncate_words("unbroken", 4), "unbr");
    }
}
