//! # helpdesk-mail
//!
//! Mail helpers for a shared-mailbox helpdesk.
//!
//! ## Features
//!
//! - **Template variables**: fill `{%customer.firstName%}`-style placeholders,
//!   with inline fallbacks, HTML escaping and extension hooks
//! - **Auto-responder detection**: spot vacation replies and bulk mail from
//!   their headers before answering them
//! - **Message-IDs**: deterministic or random IDs for outbound mail, plus
//!   thread-correlated IDs and body markers for matching replies
//!
//! ## Quick Start
//!
//! ### Rendering a Template
//!
//! ```ignore
//! use helpdesk_mail::vars::{MailContext, ReplaceOptions, replace_mail_vars};
//!
//! let ctx = MailContext::new().with_customer(&customer).with_user(&agent);
//! let body = replace_mail_vars(
//!     "Hi {%customer.firstName,fallback=there%},\n\n{%user.fullName%}",
//!     &ctx,
//!     &ReplaceOptions::new().escape_html(true).remove_unresolved(true),
//! );
//! ```
//!
//! ### Detecting Auto-Responders
//!
//! ```
//! use helpdesk_mail::is_auto_responder;
//!
//! assert!(is_auto_responder(Some("Subject: Away\r\nAuto-Submitted: auto-replied")));
//! assert!(!is_auto_responder(Some("Precedence: normal")));
//! assert!(!is_auto_responder(None));
//! ```
//!
//! ### Message-IDs
//!
//! ```
//! use helpdesk_mail::{MailConfig, MessageIdKind, generate_message_id};
//!
//! let id = generate_message_id("support@example.com", "raw body");
//! assert!(id.ends_with("@example.com"));
//!
//! let config = MailConfig::new("app-key")?;
//! let reply_id = config.thread_message_id(MessageIdKind::ReplyToCustomer, 42, "example.com");
//! assert_eq!(config.parse_thread_message_id(&reply_id)?.thread_id, 42);
//! # Ok::<(), helpdesk_mail::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod autoresponder;
mod config;
mod error;
mod header;

pub mod message_id;
pub mod vars;

pub use autoresponder::{
    HEADER_RULES, HeaderMatch, HeaderRule, is_auto_responder, is_auto_responder_lines,
    matching_rule,
};
pub use config::{APP_KEY_ENV, MESSAGE_ID_PREFIX_ENV, MailConfig};
pub use error::{Error, Result};
pub use header::HeaderLines;
pub use message_id::{
    MessageIdKind, ThreadMessageId, fetch_message_marker, generate_message_id, message_id_hash,
    message_marker,
};
pub use vars::{MailContext, ReplaceOptions, VarTable, replace_mail_vars};
