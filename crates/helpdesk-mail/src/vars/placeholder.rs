//! Placeholder scanning.
//!
//! A placeholder is `{%path%}` or `{%path,fallback=text%}` where `path`
//! is made of ASCII letters and dots.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{%([a-zA-Z.]+)(,fallback=([^}]*))?%\}").expect("placeholder pattern is valid")
});

#[allow(clippy::expect_used)]
static DOTTED_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{%[^%]*\.[^%]*%\}").expect("dotted placeholder pattern is valid")
});

/// A placeholder found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Dotted variable path, e.g. `customer.firstName`.
    pub path: String,
    /// Inline fallback value, if the placeholder carried one.
    pub fallback: Option<String>,
    /// The exact text matched in the template.
    pub raw: String,
}

impl Placeholder {
    /// Table key for the bare path, e.g. `{%customer.firstName%}`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{{%{}%}}", self.path)
    }

    /// Returns true if the path contains a dot.
    #[must_use]
    pub fn is_dotted(&self) -> bool {
        self.path.contains('.')
    }
}

/// Returns every placeholder in `text`, in order of appearance.
#[must_use]
pub fn scan(text: &str) -> Vec<Placeholder> {
    PLACEHOLDER
        .captures_iter(text)
        .map(|caps| Placeholder {
            path: caps[1].to_string(),
            fallback: caps.get(3).map(|m| m.as_str().to_string()),
            raw: caps[0].to_string(),
        })
        .collect()
}

/// Removes every remaining `{%...%}` whose body contains a dot.
#[must_use]
pub fn strip_dotted(text: &str) -> String {
    DOTTED_PLACEHOLDER.replace_all(text, "").into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_plain() {
        let found = scan("Hi {%customer.firstName%}!");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, "customer.firstName");
        assert_eq!(found[0].fallback, None);
        assert_eq!(found[0].raw, "{%customer.firstName%}");
        assert_eq!(found[0].key(), "{%customer.firstName%}");
    }

    #[test]
    fn test_scan_fallback() {
        let found = scan("Hi {%customer.firstName,fallback=there%}");
        assert_eq!(found[0].fallback.as_deref(), Some("there"));
        assert_eq!(found[0].key(), "{%customer.firstName%}");
        assert_eq!(found[0].raw, "{%customer.firstName,fallback=there%}");
    }

    #[test]
    fn test_scan_empty_fallback() {
        let found = scan("{%user.phone,fallback=%}");
        assert_eq!(found[0].fallback.as_deref(), Some(""));
    }

    #[test]
    fn test_scan_order_and_duplicates() {
        let found = scan("{%b.x%} {%a.y%} {%b.x%}");
        let paths: Vec<_> = found.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["b.x", "a.y", "b.x"]);
    }

    #[test]
    fn test_scan_ignores_malformed() {
        assert!(scan("{%customer.first_name%}").is_empty());
        assert!(scan("{%customer.firstName").is_empty());
        assert!(scan("{% customer.firstName %}").is_empty());
        assert!(scan("{%%}").is_empty());
    }

    #[test]
    fn test_dotted() {
        assert!(!scan("{%subject%}")[0].is_dotted());
        assert!(scan("{%user.email%}")[0].is_dotted());
    }

    #[test]
    fn test_strip_dotted_only() {
        assert_eq!(strip_dotted("a {%x.y%} b {%subject%}"), "a  b {%subject%}");
        assert_eq!(strip_dotted("{%x.y,fallback=z%}"), "");
    }
}
