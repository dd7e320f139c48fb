//! Message-ID generation and correlation.
//!
//! Outbound mail gets a Message-ID the helpdesk can recognise again when a
//! customer replies, either through `In-Reply-To`/`References` (see
//! [`thread_message_id`]) or through a marker embedded in the body (see
//! [`message_marker`]).

use std::fmt;
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use regex::Regex;
use tracing::trace;

use crate::error::{Error, Result};

/// Prefix of generated Message-ID local parts.
pub const MESSAGE_ID_PREFIX: &str = "fs";

/// Length of the random local part used when there is no body to hash.
const RANDOM_LOCAL_PART_LEN: usize = 16;

#[allow(clippy::expect_used)]
static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{#FS:([A-Za-z0-9+/=]+)#\}").expect("marker pattern is valid")
});

/// Hex-encoded MD5 digest.
fn md5_hex(data: impl AsRef<[u8]>) -> String {
    format!("{:x}", md5::compute(data))
}

/// Returns the part of `address` after its last `@`, or the whole string
/// if there is none.
#[must_use]
pub fn email_domain(address: &str) -> &str {
    address.rsplit_once('@').map_or(address, |(_, domain)| domain)
}

/// Generates a Message-ID (without angle brackets) for outbound mail.
///
/// With a non-empty `raw_body` the local part is the MD5 digest of the
/// body, so identical bodies yield identical IDs. Otherwise it is a random
/// 16-character alphanumeric string.
#[must_use]
pub fn generate_message_id(email_address: &str, raw_body: &str) -> String {
    generate_message_id_with_prefix(MESSAGE_ID_PREFIX, email_address, raw_body)
}

/// Same as [`generate_message_id`] with a custom prefix.
#[must_use]
pub fn generate_message_id_with_prefix(prefix: &str, email_address: &str, raw_body: &str) -> String {
    let local = if raw_body.is_empty() {
        random_local_part()
    } else {
        md5_hex(raw_body)
    };
    format!("{prefix}-{local}@{}", email_domain(email_address))
}

fn random_local_part() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_LOCAL_PART_LEN)
        .map(char::from)
        .collect()
}

/// Opaque correlation token for a thread: MD5 of the thread id followed
/// by the application key. Not reversible.
#[must_use]
pub fn message_id_hash(thread_id: u64, app_key: &str) -> String {
    md5_hex(format!("{thread_id}{app_key}"))
}

/// What kind of outbound message a thread Message-ID belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageIdKind {
    /// Notification sent to an agent.
    Notification,
    /// Agent reply sent to the customer.
    ReplyToCustomer,
    /// Automatic reply sent to the customer.
    AutoReply,
}

impl MessageIdKind {
    /// All kinds.
    pub const ALL: [Self; 3] = [Self::Notification, Self::ReplyToCustomer, Self::AutoReply];

    /// Local-part prefix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Notification => "notify",
            Self::ReplyToCustomer => "reply",
            Self::AutoReply => "auto-reply",
        }
    }
}

impl fmt::Display for MessageIdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds `<kind>-<thread_id>-<hash>-<unix_ts>@<domain>`.
///
/// `domain` may be a full address; only the part after the last `@` is
/// used.
#[must_use]
pub fn thread_message_id(
    kind: MessageIdKind,
    thread_id: u64,
    app_key: &str,
    domain: &str,
    timestamp: DateTime<Utc>,
) -> String {
    format!(
        "{kind}-{thread_id}-{}-{}@{}",
        message_id_hash(thread_id, app_key),
        timestamp.timestamp(),
        email_domain(domain)
    )
}

/// A verified thread Message-ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadMessageId {
    /// Kind of message.
    pub kind: MessageIdKind,
    /// Thread the message belongs to.
    pub thread_id: u64,
    /// When the message was generated.
    pub timestamp: DateTime<Utc>,
    /// Domain part.
    pub domain: String,
}

/// Parses and verifies a Message-ID produced by [`thread_message_id`].
///
/// Surrounding `<` `>` and whitespace are accepted.
///
/// # Errors
///
/// Returns [`Error::InvalidMessageId`] if the value has the wrong shape or
/// its hash does not match `thread_id` under `app_key`.
pub fn parse_thread_message_id(value: &str, app_key: &str) -> Result<ThreadMessageId> {
    let invalid = || Error::InvalidMessageId(value.to_string());

    let trimmed = value.trim();
    let trimmed = trimmed.strip_prefix('<').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('>').unwrap_or(trimmed);
    let (local, domain) = trimmed.rsplit_once('@').ok_or_else(invalid)?;

    let (kind, rest) = MessageIdKind::ALL
        .into_iter()
        .find_map(|kind| {
            local
                .strip_prefix(kind.as_str())
                .and_then(|rest| rest.strip_prefix('-'))
                .map(|rest| (kind, rest))
        })
        .ok_or_else(invalid)?;

    let mut parts = rest.splitn(3, '-');
    let (Some(thread_id), Some(hash), Some(timestamp)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let thread_id: u64 = thread_id.parse().map_err(|_| invalid())?;
    if hash != message_id_hash(thread_id, app_key) {
        trace!("Message-ID hash mismatch for thread {thread_id}");
        return Err(invalid());
    }
    let timestamp = timestamp
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .ok_or_else(invalid)?;

    Ok(ThreadMessageId {
        kind,
        thread_id,
        timestamp,
        domain: domain.to_string(),
    })
}

/// Marker embedded in outbound bodies so replies can be matched even when
/// the customer's client drops threading headers.
#[must_use]
pub fn message_marker(message_id: &str) -> String {
    format!("{{#FS:{}#}}", STANDARD.encode(message_id))
}

/// Finds the first marker in `body` and returns the Message-ID it carries.
///
/// # Errors
///
/// Returns an error if a marker is present but its payload does not
/// decode to UTF-8 text.
pub fn fetch_message_marker(body: &str) -> Result<Option<String>> {
    let Some(caps) = MARKER.captures(body) else {
        return Ok(None);
    };
    let decoded = STANDARD.decode(&caps[1])?;
    Ok(Some(String::from_utf8(decoded)?))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::unreadable_literal
)]
mod tests {
    use super::*;

    const KEY: &str = "base64:s3cr3t";

    #[test]
    fn test_email_domain() {
        assert_eq!(email_domain("a@b.com"), "b.com");
        assert_eq!(email_domain("weird@name@host.org"), "host.org");
        assert_eq!(email_domain("localhost"), "localhost");
    }

    #[test]
    fn test_generate_from_body_is_deterministic() {
        let first = generate_message_id("user@example.com", "body");
        let second = generate_message_id("user@example.com", "body");
        assert_eq!(first, second);
        assert_eq!(first, "fs-841a2d689ad86bd1611447453c22c6fc@example.com");
    }

    #[test]
    fn test_generate_random() {
        let first = generate_message_id("user@example.com", "");
        let second = generate_message_id("user@example.com", "");
        assert_ne!(first, second);

        let local = first
            .strip_prefix("fs-")
            .and_then(|rest| rest.strip_suffix("@example.com"))
            .unwrap();
        assert_eq!(local.len(), 16);
        assert!(local.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_custom_prefix() {
        let id = generate_message_id_with_prefix("hd", "a@b.com", "x");
        assert!(id.starts_with("hd-"));
        assert!(id.ends_with("@b.com"));
    }

    #[test]
    fn test_message_id_hash() {
        let hash = message_id_hash(42, KEY);
        assert_eq!(hash.len(), 32);
        assert_eq!(hash, md5_hex(format!("42{KEY}")));
        assert_ne!(hash, message_id_hash(43, KEY));
        assert_ne!(hash, message_id_hash(42, "other"));
    }

    #[test]
    fn test_thread_message_id_round_trip() {
        let ts = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        for kind in MessageIdKind::ALL {
            let id = thread_message_id(kind, 991, KEY, "support@example.com", ts);
            assert!(id.starts_with(&format!("{kind}-991-")));
            assert!(id.ends_with("-1700000000@example.com"));

            let parsed = parse_thread_message_id(&format!("<{id}>"), KEY).unwrap();
            assert_eq!(parsed.kind, kind);
            assert_eq!(parsed.thread_id, 991);
            assert_eq!(parsed.timestamp, ts);
            assert_eq!(parsed.domain, "example.com");
        }
    }

    #[test]
    fn test_parse_rejects_wrong_key() {
        let ts = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        let id = thread_message_id(MessageIdKind::ReplyToCustomer, 5, KEY, "example.com", ts);
        assert!(matches!(
            parse_thread_message_id(&id, "wrong"),
            Err(Error::InvalidMessageId(_))
        ));
    }

    #[test]
    fn test_parse_rejects_foreign_ids() {
        for value in [
            "",
            "CAFx1234@mail.gmail.com",
            "fs-841a2d689ad86bd1611447453c22c6fc@example.com",
            "reply-abc-def-1@example.com",
            "reply-1@example.com",
            "notify-1-hash-ts",
        ] {
            assert!(parse_thread_message_id(value, KEY).is_err(), "{value}");
        }
    }

    #[test]
    fn test_message_marker_round_trip() {
        let marker = message_marker("reply-1-abc-2@example.com");
        assert!(marker.starts_with("{#FS:"));
        assert!(marker.ends_with("#}"));

        let body = format!("Thanks!\n\n{marker}\n> quoted text");
        assert_eq!(
            fetch_message_marker(&body).unwrap().as_deref(),
            Some("reply-1-abc-2@example.com")
        );
    }

    #[test]
    fn test_fetch_marker_absent() {
        assert_eq!(fetch_message_marker("no marker here").unwrap(), None);
    }

    #[test]
    fn test_fetch_marker_bad_payload() {
        assert!(fetch_message_marker("{#FS:abc#}").is_err());
    }
}
