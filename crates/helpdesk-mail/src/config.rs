//! Mail helper configuration.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::message_id::{self, MESSAGE_ID_PREFIX, MessageIdKind};

/// Environment variable holding the application key.
pub const APP_KEY_ENV: &str = "HELPDESK_APP_KEY";

/// Environment variable overriding the Message-ID prefix.
pub const MESSAGE_ID_PREFIX_ENV: &str = "HELPDESK_MESSAGE_ID_PREFIX";

fn default_prefix() -> String {
    MESSAGE_ID_PREFIX.to_string()
}

/// Configuration shared by the Message-ID helpers.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Secret application key mixed into thread hashes.
    app_key: SecretString,
    /// Prefix of generated Message-IDs.
    #[serde(default = "default_prefix")]
    message_id_prefix: String,
}

impl MailConfig {
    /// Creates a configuration with the default Message-ID prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAppKey`] if `app_key` is blank.
    pub fn new(app_key: impl Into<String>) -> Result<Self> {
        Self {
            app_key: SecretString::from(app_key.into()),
            message_id_prefix: default_prefix(),
        }
        .validated()
    }

    /// Sets the Message-ID prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the prefix is empty or contains
    /// characters not allowed in a Message-ID local part.
    pub fn with_message_id_prefix(mut self, prefix: impl Into<String>) -> Result<Self> {
        self.message_id_prefix = prefix.into();
        self.validated()
    }

    /// Loads configuration from `HELPDESK_APP_KEY` and, if set,
    /// `HELPDESK_MESSAGE_ID_PREFIX`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or blank, or the prefix is
    /// invalid.
    pub fn from_env() -> Result<Self> {
        let app_key = std::env::var(APP_KEY_ENV).map_err(|_| Error::MissingAppKey)?;
        let config = Self::new(app_key)?;
        debug!("Loaded mail config from environment");
        match std::env::var(MESSAGE_ID_PREFIX_ENV) {
            Ok(prefix) => config.with_message_id_prefix(prefix),
            Err(_) => Ok(config),
        }
    }

    /// Loads configuration from a JSON document such as
    /// `{"app_key": "...", "message_id_prefix": "hd"}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed, the key is blank, or
    /// the prefix is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        debug!("Loaded mail config from JSON");
        config.validated()
    }

    fn validated(self) -> Result<Self> {
        if self.app_key.expose_secret().trim().is_empty() {
            return Err(Error::MissingAppKey);
        }
        let prefix = &self.message_id_prefix;
        if prefix.is_empty()
            || !prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::Config(format!("invalid Message-ID prefix: {prefix:?}")));
        }
        Ok(self)
    }

    /// Configured Message-ID prefix.
    #[must_use]
    pub fn message_id_prefix(&self) -> &str {
        &self.message_id_prefix
    }

    /// Generates a Message-ID with the configured prefix.
    #[must_use]
    pub fn generate_message_id(&self, email_address: &str, raw_body: &str) -> String {
        message_id::generate_message_id_with_prefix(&self.message_id_prefix, email_address, raw_body)
    }

    /// Thread hash under the configured key.
    #[must_use]
    pub fn message_id_hash(&self, thread_id: u64) -> String {
        message_id::message_id_hash(thread_id, self.app_key.expose_secret())
    }

    /// Thread Message-ID under the configured key, stamped with the
    /// current time.
    #[must_use]
    pub fn thread_message_id(&self, kind: MessageIdKind, thread_id: u64, domain: &str) -> String {
        self.thread_message_id_at(kind, thread_id, domain, Utc::now())
    }

    /// Thread Message-ID under the configured key with an explicit time.
    #[must_use]
    pub fn thread_message_id_at(
        &self,
        kind: MessageIdKind,
        thread_id: u64,
        domain: &str,
        timestamp: DateTime<Utc>,
    ) -> String {
        message_id::thread_message_id(
            kind,
            thread_id,
            self.app_key.expose_secret(),
            domain,
            timestamp,
        )
    }

    /// Parses and verifies a thread Message-ID under the configured key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMessageId`] if verification fails.
    pub fn parse_thread_message_id(&self, value: &str) -> Result<message_id::ThreadMessageId> {
        message_id::parse_thread_message_id(value, self.app_key.expose_secret())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_blank_key() {
        assert!(matches!(MailConfig::new(""), Err(Error::MissingAppKey)));
        assert!(matches!(MailConfig::new("   "), Err(Error::MissingAppKey)));
    }

    #[test]
    fn test_debug_hides_key() {
        let config = MailConfig::new("super-secret").unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_default_prefix() {
        let config = MailConfig::new("k").unwrap();
        assert_eq!(config.message_id_prefix(), "fs");
        assert!(config.generate_message_id("a@b.com", "x").starts_with("fs-"));
    }

    #[test]
    fn test_custom_prefix() {
        let config = MailConfig::new("k").unwrap().with_message_id_prefix("hd").unwrap();
        assert!(config.generate_message_id("a@b.com", "").starts_with("hd-"));
        assert!(MailConfig::new("k").unwrap().with_message_id_prefix("").is_err());
        assert!(MailConfig::new("k").unwrap().with_message_id_prefix("a@b").is_err());
    }

    #[test]
    fn test_from_json() {
        let config = MailConfig::from_json(r#"{"app_key": "k1"}"#).unwrap();
        assert_eq!(config.message_id_prefix(), "fs");
        assert_eq!(config.message_id_hash(7), message_id::message_id_hash(7, "k1"));

        let config =
            MailConfig::from_json(r#"{"app_key": "k1", "message_id_prefix": "desk"}"#).unwrap();
        assert_eq!(config.message_id_prefix(), "desk");
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(MailConfig::from_json("{"), Err(Error::Json(_))));
        assert!(matches!(MailConfig::from_json("{}"), Err(Error::Json(_))));
        assert!(matches!(
            MailConfig::from_json(r#"{"app_key": ""}"#),
            Err(Error::MissingAppKey)
        ));
    }

    #[test]
    fn test_thread_message_id_round_trip() {
        let config = MailConfig::new("key").unwrap();
        let id = config.thread_message_id(MessageIdKind::AutoReply, 12, "help@example.org");
        let parsed = config.parse_thread_message_id(&id).unwrap();
        assert_eq!(parsed.kind, MessageIdKind::AutoReply);
        assert_eq!(parsed.thread_id, 12);
        assert_eq!(parsed.domain, "example.org");

        let other = MailConfig::new("other").unwrap();
        assert!(other.parse_thread_message_id(&id).is_err());
    }
}
