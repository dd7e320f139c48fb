//! Context objects that feed template variables.
//!
//! Each slot is described by a capability trait. Every method has an
//! empty default, so a domain type only implements what it actually
//! knows and missing fields render as empty strings.

use std::fmt;

/// Conversation fields available to templates.
pub trait ConversationVars {
    /// Conversation subject.
    fn subject(&self) -> String {
        String::new()
    }

    /// Human-facing conversation number.
    fn number(&self) -> Option<u64> {
        None
    }

    /// Customer email stored on the conversation itself.
    fn customer_email(&self) -> String {
        String::new()
    }
}

/// Display name and address a mailbox sends from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailFrom {
    /// Display name, if any.
    pub name: Option<String>,
    /// Sender address.
    pub address: String,
}

/// Mailbox fields available to templates.
pub trait MailboxVars {
    /// Mailbox email address.
    fn email(&self) -> String {
        String::new()
    }

    /// Mailbox name.
    fn name(&self) -> String {
        String::new()
    }

    /// Sender identity for mail written by `user` (or by the mailbox
    /// itself when no user is given).
    fn mail_from(&self, user: Option<&dyn UserVars>) -> Option<MailFrom> {
        let _ = user;
        None
    }
}

/// Customer fields available to templates.
pub trait CustomerVars {
    /// Full name.
    fn full_name(&self) -> String {
        String::new()
    }

    /// First name.
    fn first_name(&self) -> String {
        String::new()
    }

    /// Last name.
    fn last_name(&self) -> String {
        String::new()
    }

    /// Company.
    fn company(&self) -> String {
        String::new()
    }
}

/// Agent (user) fields available to templates.
pub trait UserVars {
    /// Full name.
    fn full_name(&self) -> String {
        String::new()
    }

    /// First name.
    fn first_name(&self) -> String {
        String::new()
    }

    /// Last name.
    fn last_name(&self) -> String {
        String::new()
    }

    /// Phone number.
    fn phone(&self) -> String {
        String::new()
    }

    /// Email address.
    fn email(&self) -> String {
        String::new()
    }

    /// Job title.
    fn job_title(&self) -> String {
        String::new()
    }

    /// Avatar URL, for user types that have one.
    fn photo_url(&self) -> Option<String> {
        None
    }
}

/// The set of optional objects a template is rendered against.
#[derive(Clone, Copy, Default)]
pub struct MailContext<'a> {
    /// Conversation slot.
    pub conversation: Option<&'a dyn ConversationVars>,
    /// Mailbox slot.
    pub mailbox: Option<&'a dyn MailboxVars>,
    /// Customer slot.
    pub customer: Option<&'a dyn CustomerVars>,
    /// User slot.
    pub user: Option<&'a dyn UserVars>,
    /// Pre-computed mailbox from-name; skips [`MailboxVars::mail_from`].
    pub mailbox_from_name: Option<&'a str>,
}

impl<'a> MailContext<'a> {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the conversation.
    #[must_use]
    pub fn with_conversation(mut self, conversation: &'a dyn ConversationVars) -> Self {
        self.conversation = Some(conversation);
        self
    }

    /// Sets the mailbox.
    #[must_use]
    pub fn with_mailbox(mut self, mailbox: &'a dyn MailboxVars) -> Self {
        self.mailbox = Some(mailbox);
        self
    }

    /// Sets the customer.
    #[must_use]
    pub fn with_customer(mut self, customer: &'a dyn CustomerVars) -> Self {
        self.customer = Some(customer);
        self
    }

    /// Sets the user.
    #[must_use]
    pub fn with_user(mut self, user: &'a dyn UserVars) -> Self {
        self.user = Some(user);
        self
    }

    /// Sets the pre-computed mailbox from-name.
    #[must_use]
    pub fn with_mailbox_from_name(mut self, name: &'a str) -> Self {
        self.mailbox_from_name = Some(name);
        self
    }

    /// Resolves `{%mailbox.fromName%}`: the override when given, otherwise
    /// the name part of the mailbox's sender identity.
    #[must_use]
    pub fn mailbox_from_name(&self) -> String {
        if let Some(name) = self.mailbox_from_name {
            return name.to_string();
        }
        self.mailbox
            .and_then(|mailbox| mailbox.mail_from(self.user))
            .and_then(|from| from.name)
            .unwrap_or_default()
    }
}

impl fmt::Debug for MailContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailContext")
            .field("conversation", &self.conversation.is_some())
            .field("mailbox", &self.mailbox.is_some())
            .field("customer", &self.customer.is_some())
            .field("user", &self.user.is_some())
            .field("mailbox_from_name", &self.mailbox_from_name)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new)]
mod tests {
    use super::*;

    struct Agent;

    impl UserVars for Agent {
        fn full_name(&self) -> String {
            "Ann Agent".into()
        }
    }

    struct Support;

    impl MailboxVars for Support {
        fn mail_from(&self, user: Option<&dyn UserVars>) -> Option<MailFrom> {
            let name = user.map_or_else(|| "Support".to_string(), |u| format!("{} via Support", u.full_name()));
            Some(MailFrom {
                name: Some(name),
                address: "support@example.com".into(),
            })
        }
    }

    struct Bare;

    impl MailboxVars for Bare {}

    #[test]
    fn test_from_name_uses_override() {
        let ctx = MailContext::new()
            .with_mailbox(&Support)
            .with_mailbox_from_name("Override");
        assert_eq!(ctx.mailbox_from_name(), "Override");
    }

    #[test]
    fn test_from_name_asks_mailbox_with_user() {
        let ctx = MailContext::new().with_mailbox(&Support).with_user(&Agent);
        assert_eq!(ctx.mailbox_from_name(), "Ann Agent via Support");

        let ctx = MailContext::new().with_mailbox(&Support);
        assert_eq!(ctx.mailbox_from_name(), "Support");
    }

    #[test]
    fn test_from_name_empty_without_capability() {
        let ctx = MailContext::new().with_mailbox(&Bare);
        assert_eq!(ctx.mailbox_from_name(), "");
    }

    #[test]
    fn test_debug_reports_presence_only() {
        let ctx = MailContext::new().with_user(&Agent);
        let debug = format!("{ctx:?}");
        assert!(debug.contains("user: true"));
        assert!(debug.contains("mailbox: false"));
    }
}
