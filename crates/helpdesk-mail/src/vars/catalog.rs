//! Catalog of the variables the engine knows how to fill.

use std::fmt;

use super::context::MailContext;

/// Context slot that supplies a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarSlot {
    /// Conversation.
    Conversation,
    /// Mailbox.
    Mailbox,
    /// Customer.
    Customer,
    /// Agent writing the reply.
    User,
}

impl VarSlot {
    /// Slot name as used in variable paths.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Conversation => "conversation",
            Self::Mailbox => "mailbox",
            Self::Customer => "customer",
            Self::User => "user",
        }
    }
}

impl fmt::Display for VarSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A built-in template variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MailVar {
    /// `{%subject%}`
    Subject,
    /// `{%conversation.number%}`
    ConversationNumber,
    /// `{%customer.email%}`, taken from the conversation.
    CustomerEmail,
    /// `{%mailbox.email%}`
    MailboxEmail,
    /// `{%mailbox.name%}`
    MailboxName,
    /// `{%mailbox.fromName%}`
    MailboxFromName,
    /// `{%customer.fullName%}`
    CustomerFullName,
    /// `{%customer.firstName%}`
    CustomerFirstName,
    /// `{%customer.lastName%}`
    CustomerLastName,
    /// `{%customer.company%}`
    CustomerCompany,
    /// `{%user.fullName%}`
    UserFullName,
    /// `{%user.firstName%}`
    UserFirstName,
    /// `{%user.phone%}`
    UserPhone,
    /// `{%user.email%}`
    UserEmail,
    /// `{%user.jobTitle%}`
    UserJobTitle,
    /// `{%user.lastName%}`
    UserLastName,
    /// `{%user.photoUrl%}`
    UserPhotoUrl,
}

impl MailVar {
    /// Every built-in variable, grouped by slot.
    pub const ALL: [Self; 17] = [
        Self::Subject,
        Self::ConversationNumber,
        Self::CustomerEmail,
        Self::MailboxEmail,
        Self::MailboxName,
        Self::MailboxFromName,
        Self::CustomerFullName,
        Self::CustomerFirstName,
        Self::CustomerLastName,
        Self::CustomerCompany,
        Self::UserFullName,
        Self::UserFirstName,
        Self::UserPhone,
        Self::UserEmail,
        Self::UserJobTitle,
        Self::UserLastName,
        Self::UserPhotoUrl,
    ];

    /// Placeholder text, e.g. `{%customer.fullName%}`.
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Subject => "{%subject%}",
            Self::ConversationNumber => "{%conversation.number%}",
            Self::CustomerEmail => "{%customer.email%}",
            Self::MailboxEmail => "{%mailbox.email%}",
            Self::MailboxName => "{%mailbox.name%}",
            Self::MailboxFromName => "{%mailbox.fromName%}",
            Self::CustomerFullName => "{%customer.fullName%}",
            Self::CustomerFirstName => "{%customer.firstName%}",
            Self::CustomerLastName => "{%customer.lastName%}",
            Self::CustomerCompany => "{%customer.company%}",
            Self::UserFullName => "{%user.fullName%}",
            Self::UserFirstName => "{%user.firstName%}",
            Self::UserPhone => "{%user.phone%}",
            Self::UserEmail => "{%user.email%}",
            Self::UserJobTitle => "{%user.jobTitle%}",
            Self::UserLastName => "{%user.lastName%}",
            Self::UserPhotoUrl => "{%user.photoUrl%}",
        }
    }

    /// Slot whose presence enables this variable.
    #[must_use]
    pub const fn slot(self) -> VarSlot {
        match self {
            Self::Subject | Self::ConversationNumber | Self::CustomerEmail => VarSlot::Conversation,
            Self::MailboxEmail | Self::MailboxName | Self::MailboxFromName => VarSlot::Mailbox,
            Self::CustomerFullName
            | Self::CustomerFirstName
            | Self::CustomerLastName
            | Self::CustomerCompany => VarSlot::Customer,
            Self::UserFullName
            | Self::UserFirstName
            | Self::UserPhone
            | Self::UserEmail
            | Self::UserJobTitle
            | Self::UserLastName
            | Self::UserPhotoUrl => VarSlot::User,
        }
    }

    /// Label shown in the reply editor's variable picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Subject => "Subject",
            Self::ConversationNumber => "Conversation Number",
            Self::CustomerEmail => "Customer Email",
            Self::MailboxEmail => "Mailbox Email",
            Self::MailboxName => "Mailbox Name",
            Self::MailboxFromName => "Mailbox From Name",
            Self::CustomerFullName => "Customer Full Name",
            Self::CustomerFirstName => "Customer First Name",
            Self::CustomerLastName => "Customer Last Name",
            Self::CustomerCompany => "Customer Company",
            Self::UserFullName => "User Full Name",
            Self::UserFirstName => "User First Name",
            Self::UserPhone => "User Phone",
            Self::UserEmail => "User Email",
            Self::UserJobTitle => "User Job Title",
            Self::UserLastName => "User Last Name",
            Self::UserPhotoUrl => "User Photo URL",
        }
    }

    /// Variables supplied by one slot.
    pub fn for_slot(slot: VarSlot) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |var| var.slot() == slot)
    }

    /// Looks a variable up by its placeholder text.
    #[must_use]
    pub fn from_placeholder(placeholder: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|var| var.placeholder() == placeholder)
    }

    /// Reads the value from `ctx`, or `None` when the slot is absent.
    #[must_use]
    pub fn resolve(self, ctx: &MailContext<'_>) -> Option<String> {
        match self.slot() {
            VarSlot::Conversation => {
                let conversation = ctx.conversation?;
                Some(match self {
                    Self::Subject => conversation.subject(),
                    Self::ConversationNumber => conversation
                        .number()
                        .map(|n| n.to_string())
                        .unwrap_or_default(),
                    _ => conversation.customer_email(),
                })
            }
            VarSlot::Mailbox => {
                let mailbox = ctx.mailbox?;
                Some(match self {
                    Self::MailboxEmail => mailbox.email(),
                    Self::MailboxName => mailbox.name(),
                    _ => ctx.mailbox_from_name(),
                })
            }
            VarSlot::Customer => {
                let customer = ctx.customer?;
                Some(match self {
                    Self::CustomerFullName => customer.full_name(),
                    Self::CustomerFirstName => customer.first_name(),
                    Self::CustomerLastName => customer.last_name(),
                    _ => customer.company(),
                })
            }
            VarSlot::User => {
                let user = ctx.user?;
                Some(match self {
                    Self::UserFullName => user.full_name(),
                    Self::UserFirstName => user.first_name(),
                    Self::UserPhone => user.phone(),
                    Self::UserEmail => user.email(),
                    Self::UserJobTitle => user.job_title(),
                    Self::UserLastName => user.last_name(),
                    _ => user.photo_url().unwrap_or_default(),
                })
            }
        }
    }
}

impl fmt::Display for MailVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.placeholder())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new)]
mod tests {
    use super::*;
    use crate::vars::context::{ConversationVars, UserVars};

    struct Ticket;

    impl ConversationVars for Ticket {
        fn number(&self) -> Option<u64> {
            Some(1042)
        }
    }

    struct Agent;

    impl UserVars for Agent {}

    #[test]
    fn test_placeholders_are_unique_and_scannable() {
        for var in MailVar::ALL {
            assert_eq!(MailVar::from_placeholder(var.placeholder()), Some(var));
            assert_eq!(crate::vars::placeholder::scan(var.placeholder()).len(), 1);
        }
    }

    #[test]
    fn test_for_slot() {
        let user_vars: Vec<_> = MailVar::for_slot(VarSlot::User).collect();
        assert_eq!(user_vars.len(), 7);
        assert!(user_vars.contains(&MailVar::UserPhotoUrl));
        assert_eq!(MailVar::for_slot(VarSlot::Conversation).count(), 3);
        assert_eq!(MailVar::for_slot(VarSlot::Mailbox).count(), 3);
        assert_eq!(MailVar::for_slot(VarSlot::Customer).count(), 4);
    }

    #[test]
    fn test_customer_email_comes_from_conversation() {
        assert_eq!(MailVar::CustomerEmail.slot(), VarSlot::Conversation);
    }

    #[test]
    fn test_resolve_absent_slot() {
        let ctx = MailContext::new();
        assert_eq!(MailVar::Subject.resolve(&ctx), None);
        assert_eq!(MailVar::UserEmail.resolve(&ctx), None);
    }

    #[test]
    fn test_resolve_defaults_and_values() {
        let ctx = MailContext::new().with_conversation(&Ticket).with_user(&Agent);
        assert_eq!(
            MailVar::ConversationNumber.resolve(&ctx).as_deref(),
            Some("1042")
        );
        assert_eq!(MailVar::Subject.resolve(&ctx).as_deref(), Some(""));
        assert_eq!(MailVar::UserPhotoUrl.resolve(&ctx).as_deref(), Some(""));
    }

    #[test]
    fn test_display() {
        assert_eq!(MailVar::UserJobTitle.to_string(), "{%user.jobTitle%}");
        assert_eq!(VarSlot::Mailbox.to_string(), "mailbox");
    }
}
