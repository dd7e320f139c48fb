//! Auto-responder and bulk mail detection.
//!
//! Inbound processing asks this module whether a message was generated by
//! a machine (vacation replies, mailing lists, bulk senders) before it
//! sends any automatic reply of its own, which is how mail loops between
//! two auto-responders are avoided.

use tracing::debug;

use crate::header::HeaderLines;

/// What a header rule requires of the header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMatch {
    /// The header being present is enough.
    Presence,
    /// The trimmed value must equal one of these exactly (case-sensitive).
    OneOf(&'static [&'static str]),
}

impl HeaderMatch {
    /// Returns true if `value` satisfies this match spec.
    #[must_use]
    pub fn matches(self, value: &str) -> bool {
        match self {
            Self::Presence => true,
            Self::OneOf(values) => values.contains(&value),
        }
    }
}

/// A single detection rule: lower-cased header name plus value constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRule {
    /// Lower-cased header name.
    pub name: &'static str,
    /// Value constraint.
    pub matcher: HeaderMatch,
}

const PRECEDENCE_VALUES: &[&str] = &["auto_reply", "bulk", "junk", "list"];

/// Rules checked in order; the first hit wins.
///
/// `auto-submitted` matches on presence, so even `Auto-Submitted: no`
/// classifies the message as automatic.
pub const HEADER_RULES: &[HeaderRule] = &[
    HeaderRule {
        name: "x-autoreply",
        matcher: HeaderMatch::Presence,
    },
    HeaderRule {
        name: "x-autorespond",
        matcher: HeaderMatch::Presence,
    },
    HeaderRule {
        name: "x-autoresponder",
        matcher: HeaderMatch::Presence,
    },
    HeaderRule {
        name: "auto-submitted",
        matcher: HeaderMatch::Presence,
    },
    HeaderRule {
        name: "delivered-to",
        matcher: HeaderMatch::OneOf(&["autoresponder"]),
    },
    HeaderRule {
        name: "precedence",
        matcher: HeaderMatch::OneOf(PRECEDENCE_VALUES),
    },
    HeaderRule {
        name: "x-precedence",
        matcher: HeaderMatch::OneOf(PRECEDENCE_VALUES),
    },
];

/// Returns true if the raw header blob looks like an auto-responder or
/// bulk message. `None` and empty input are never auto-responders.
#[must_use]
pub fn is_auto_responder(headers: Option<&str>) -> bool {
    match headers {
        Some(blob) if !blob.is_empty() => is_auto_responder_lines(&HeaderLines::parse(blob)),
        _ => false,
    }
}

/// Same as [`is_auto_responder`] for headers that were already parsed.
#[must_use]
pub fn is_auto_responder_lines(headers: &HeaderLines) -> bool {
    matching_rule(headers).is_some()
}

/// Returns the first rule that matches any header line.
#[must_use]
pub fn matching_rule(headers: &HeaderLines) -> Option<&'static HeaderRule> {
    HEADER_RULES.iter().find(|rule| {
        headers.iter().any(|(name, value)| {
            let hit = name == rule.name && rule.matcher.matches(value);
            if hit {
                debug!("Auto-responder header matched: {name}: {value}");
            }
            hit
        })
    })
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
    fn test_none_and_empty() {
        assert!(!is_auto_responder(None));
        assert!(!is_auto_responder(Some("")));
    }

    #[test]
    fn test_presence_headers() {
        for name in ["X-Autoreply", "X-Autorespond", "X-Autoresponder", "Auto-Submitted"] {
            let blob = format!("From: a@example.com\n{name}: anything");
            assert!(is_auto_responder(Some(blob.as_str())), "{name}");
        }
    }

    #[test]
    fn test_auto_submitted_no_still_matches() {
        assert!(is_auto_responder(Some("Auto-Submitted: no")));
    }

    #[test]
    fn test_precedence_values() {
        for value in ["bulk", "junk", "list", "auto_reply"] {
            assert!(is_auto_responder(Some(format!("Precedence: {value}").as_str())));
            assert!(is_auto_responder(Some(format!("X-Precedence: {value}").as_str())));
        }
        assert!(!is_auto_responder(Some("Precedence: normal")));
    }

    #[test]
    fn test_value_comparison_is_case_sensitive() {
        assert!(!is_auto_responder(Some("Precedence: Bulk")));
        assert!(!is_auto_responder(Some("Delivered-To: AutoResponder")));
    }

    #[test]
    fn test_delivered_to() {
        assert!(is_auto_responder(Some("Delivered-To: autoresponder")));
        assert!(!is_auto_responder(Some("Delivered-To: support@example.com")));
    }

    #[test]
    fn test_crlf_and_padding() {
        let blob = "Subject: Hi\r\nPrecedence:   list  \r\n";
        assert!(is_auto_responder(Some(blob)));
    }

    #[test]
    fn test_malformed_lines_tolerated() {
        let blob = "this is not a header\n\n:::\nSubject: hello";
        assert!(!is_auto_responder(Some(blob)));
    }

    #[test]
    fn test_matching_rule_reports_first_rule() {
        let headers = HeaderLines::parse("Precedence: bulk\nX-Autoreply: yes");
        let rule = matching_rule(&headers).unwrap();
        assert_eq!(rule.name, "x-autoreply");
    }

    #[test]
    fn test_plain_customer_mail() {
        let blob = concat!(
            "From: Jane <jane@example.com>\r\n",
            "To: support@example.com\r\n",
            "Subject: Order #42\r\n",
            "Message-ID: <abc@example.com>\r\n",
        );
        assert!(!is_auto_responder(Some(blob)));
    }
}
