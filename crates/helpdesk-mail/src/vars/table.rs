//! Variable table and substitution.

use std::cmp::Reverse;
use std::collections::HashMap;

/// Maps placeholder text (`{%customer.email%}`) to its rendered value.
///
/// Built fresh for every render; nothing is cached between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarTable {
    vars: HashMap<String, String>,
}

impl VarTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Gets the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Returns true if the key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Removes a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    /// Returns an iterator over `(key, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Rewrites every value in place.
    pub fn map_values(&mut self, mut f: impl FnMut(&str) -> String) {
        for value in self.vars.values_mut() {
            *value = f(value.as_str());
        }
    }

    /// Replaces every occurrence of every key in `text` in a single pass.
    ///
    /// At each position the longest matching key wins, and replaced text
    /// is never scanned again, so a value containing another key's text
    /// is emitted as-is. Empty keys are ignored.
    #[must_use]
    pub fn substitute(&self, text: &str) -> String {
        let mut keys: Vec<(&str, &str)> = self.iter().filter(|(k, _)| !k.is_empty()).collect();
        if keys.is_empty() {
            return text.to_string();
        }
        keys.sort_by_key(|(key, _)| Reverse(key.len()));

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(ch) = rest.chars().next() {
            if let Some((key, value)) = keys.iter().find(|(key, _)| rest.starts_with(key)) {
                out.push_str(value);
                rest = &rest[key.len()..];
            } else {
                out.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VarTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let mut table = VarTable::new();
        assert!(table.is_empty());
        table.insert("{%a.b%}", "x");
        assert_eq!(table.get("{%a.b%}"), Some("x"));
        assert!(table.contains("{%a.b%}"));
        assert_eq!(table.remove("{%a.b%}").as_deref(), Some("x"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_substitute_all_occurrences() {
        let table: VarTable = [("{%a.b%}", "X")].into_iter().collect();
        assert_eq!(table.substitute("{%a.b%}-{%a.b%}"), "X-X");
    }

    #[test]
    fn test_substitute_longest_key_first() {
        let table: VarTable = [("{%a%}", "short"), ("{%a%}x", "long")]
            .into_iter()
            .collect();
        assert_eq!(table.substitute("{%a%}x {%a%}"), "long short");
    }

    #[test]
    fn test_substitute_does_not_rescan_values() {
        let table: VarTable = [("{%a.b%}", "{%c.d%}"), ("{%c.d%}", "nope")]
            .into_iter()
            .collect();
        assert_eq!(table.substitute("{%a.b%}"), "{%c.d%}");
    }

    #[test]
    fn test_substitute_ignores_empty_key() {
        let table: VarTable = [("", "boom")].into_iter().collect();
        assert_eq!(table.substitute("abc"), "abc");
    }

    #[test]
    fn test_substitute_multibyte_text() {
        let table: VarTable = [("{%user.firstName%}", "Zoë")].into_iter().collect();
        assert_eq!(table.substitute("¡Hola {%user.firstName%}!"), "¡Hola Zoë!");
    }

    #[test]
    fn test_map_values() {
        let mut table: VarTable = [("k", "v")].into_iter().collect();
        table.map_values(str::to_uppercase);
        assert_eq!(table.get("k"), Some("V"));
    }
}
