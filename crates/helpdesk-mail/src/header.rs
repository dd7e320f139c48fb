//! Raw header blob handling.

use std::fmt;

/// Header lines parsed from a raw header blob.
///
/// Unlike a full RFC 5322 parser this keeps one entry per physical line:
/// folded continuation lines and lines without a colon are dropped rather
/// than rejected, so arbitrary inbound junk never turns into an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderLines {
    lines: Vec<(String, String)>,
}

impl HeaderLines {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses headers from a raw blob.
    ///
    /// Each newline-separated segment is split on its first `:`. The name is
    /// trimmed and lower-cased, the value is trimmed. Segments with no colon
    /// are skipped.
    ///
    /// ```text
    /// X-Autoreply: yes
    /// Precedence: bulk
    /// ```
    #[must_use]
    pub fn parse(blob: &str) -> Self {
        let lines = blob
            .split('\n')
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim().to_lowercase(), value.trim().to_string()))
            .collect();

        Self { lines }
    }

    /// Appends a header line.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().trim().to_lowercase();
        let value = value.into().trim().to_string();
        self.lines.push((name, value));
    }

    /// Gets the first value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Returns true if at least one line carries the header.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns an iterator over `(name, value)` pairs in blob order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lines.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of parsed lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if no line was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for HeaderLines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.lines {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let blob = concat!(
            "From: sender@example.com\r\n",
            "X-Autoreply: yes\r\n",
            "Subject: Out of office\r\n",
        );

        let headers = HeaderLines::parse(blob);
        assert_eq!(headers.len(), 3);
        assert_eq!(headers.get("from"), Some("sender@example.com"));
        assert_eq!(headers.get("X-AUTOREPLY"), Some("yes"));
        assert_eq!(headers.get("subject"), Some("Out of office"));
    }

    #[test]
    fn test_parse_splits_on_first_colon_only() {
        let headers = HeaderLines::parse("Received: from host; Mon, 1 Jan 2024 10:00:00");
        assert_eq!(
            headers.get("received"),
            Some("from host; Mon, 1 Jan 2024 10:00:00")
        );
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let blob = "garbage line\nPrecedence: bulk\n\n   \n";
        let headers = HeaderLines::parse(blob);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("precedence"), Some("bulk"));
    }

    #[test]
    fn test_parse_empty() {
        assert!(HeaderLines::parse("").is_empty());
    }

    #[test]
    fn test_name_whitespace_trimmed() {
        let headers = HeaderLines::parse("  Auto-Submitted  :   auto-replied  ");
        assert!(headers.contains("auto-submitted"));
        assert_eq!(headers.get("auto-submitted"), Some("auto-replied"));
    }

    #[test]
    fn test_add_and_display() {
        let mut headers = HeaderLines::new();
        headers.add("Precedence", " list ");
        assert_eq!(headers.to_string(), "precedence: list\n");
    }

    #[test]
    fn test_duplicate_headers_kept_in_order() {
        let headers = HeaderLines::parse("Delivered-To: a@example.com\nDelivered-To: autoresponder");
        let values: Vec<_> = headers
            .iter()
            .filter(|(n, _)| *n == "delivered-to")
            .map(|(_, v)| v)
            .collect();
        assert_eq!(values, vec!["a@example.com", "autoresponder"]);
    }
}
