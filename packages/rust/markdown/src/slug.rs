//! Filesystem-safe slugs for fallback output paths.

use std::sync::LazyLock;

use regex::Regex;

/// Turn arbitrary text into a lowercase slug.
///
/// Whitespace runs become a single `-`, and anything outside `[a-z0-9-_.]`
/// is dropped. Never returns an empty string: text with no usable characters
/// becomes `"untitled"`.
pub fn slugify(text: &str) -> String {
    static WHITESPACE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
    static DISALLOWED_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^a-z0-9\-_.]").expect("valid regex"));

    let lowered = text.trim().to_lowercase();
    let hyphenated = WHITESPACE_RE.replace_all(&lowered, "-");
    let slug = DISALLOWED_RE.replace_all(&hyphenated, "");

    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("My Note"), "my-note");
        assert_eq!(slugify("  Tech  "), "tech");
        assert_eq!(slugify("Rust   and\tGo"), "rust-and-go");
    }

    #[test]
    fn slugify_drops_disallowed_characters() {
        assert_eq!(slugify("C++ / Tips!"), "c--tips");
        assert_eq!(slugify("v1.2_final"), "v1.2_final");
        assert_eq!(slugify("Café notes"), "caf-notes");
    }

    #[test]
    fn slugify_never_empty() {
        assert_eq!(slugify(""), "untitled");
        assert_eq!(slugify("   "), "untitled");
        assert_eq!(slugify("한국어"), "untitled");
        assert_eq!(slugify("?!*"), "untitled");
    }

    #[test]
    fn slugify_is_idempotent() {
        let inputs = [
            "My Note",
            "  leading and trailing  ",
            "Mixed CASE with   spaces",
            "symbols #$% and 한글",
            "",
            "already-a-slug.md",
            "tabs\tand\nnewlines",
        ];
        for input in inputs {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "not idempotent for {input:?}");
        }
    }
}
