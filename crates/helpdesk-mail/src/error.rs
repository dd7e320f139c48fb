//! Error types for helpdesk mail helpers.

use std::string::FromUtf8Error;

/// Result type alias for helpdesk mail operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Helpdesk mail error types.
///
/// The template engine and the auto-responder detector never fail; these
/// errors come from configuration loading and from decoding identifiers
/// that arrive on inbound mail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The application key is missing or blank.
    #[error("Application key is missing or empty")]
    MissingAppKey,

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration document could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Message marker payload is not valid Base64.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Message marker payload is not valid UTF-8.
    #[error("UTF-8 decode error: {0}")]
    Utf8Decode(#[from] FromUtf8Error),

    /// Message-ID was not generated by this helpdesk or failed verification.
    #[error("Invalid Message-ID: {0}")]
    InvalidMessageId(String),
}
