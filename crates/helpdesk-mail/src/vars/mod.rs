//! Mail template variables.
//!
//! Templates (auto-replies, signatures, saved replies, notification
//! subjects) contain placeholders such as `{%customer.firstName%}` or
//! `{%customer.firstName,fallback=there%}`. [`replace_mail_vars`] fills
//! them from a [`MailContext`]:
//!
//! 1. build a [`VarTable`] from the present context slots,
//! 2. run the `before_fallback` hook,
//! 3. resolve every placeholder in the text (table value, else fallback),
//! 4. run the `after_fallback` hook,
//! 5. escape / convert newlines in every value,
//! 6. substitute in a single pass,
//! 7. optionally strip unresolved dotted placeholders and trim.
//!
//! ```
//! use helpdesk_mail::vars::{CustomerVars, MailContext, ReplaceOptions, replace_mail_vars};
//!
//! struct Customer;
//!
//! impl CustomerVars for Customer {
//!     fn first_name(&self) -> String {
//!         "Jane".into()
//!     }
//! }
//!
//! let ctx = MailContext::new().with_customer(&Customer);
//! let text = replace_mail_vars("Hi {%customer.firstName%}", &ctx, &ReplaceOptions::default());
//! assert_eq!(text, "Hi Jane");
//! ```

mod catalog;
mod context;
mod format;
mod placeholder;
mod table;

use tracing::trace;

pub use catalog::{MailVar, VarSlot};
pub use context::{
    ConversationVars, CustomerVars, MailContext, MailFrom, MailboxVars, UserVars,
};
pub use format::{escape_html, nl2br};
pub use placeholder::{Placeholder, scan};
pub use table::VarTable;

/// Extension hook: receives the table and context, returns the table to
/// continue with (possibly the same one).
pub type VarsHook<'h> = dyn Fn(VarTable, &MailContext<'_>) -> VarTable + Send + Sync + 'h;

/// Rendering options for [`replace_mail_vars`].
#[derive(Clone, Copy, Default)]
pub struct ReplaceOptions<'h> {
    /// HTML-escape values before newline conversion.
    pub escape_html: bool,
    /// Replace unresolved dotted placeholders with nothing and trim the
    /// result.
    pub remove_unresolved: bool,
    /// Runs after the base table is built, before fallbacks are applied.
    pub before_fallback: Option<&'h VarsHook<'h>>,
    /// Runs after fallbacks are applied, before formatting.
    pub after_fallback: Option<&'h VarsHook<'h>>,
}

impl<'h> ReplaceOptions<'h> {
    /// Default options: no escaping, unresolved placeholders kept.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables HTML escaping.
    #[must_use]
    pub const fn escape_html(mut self, escape: bool) -> Self {
        self.escape_html = escape;
        self
    }

    /// Enables or disables removal of unresolved placeholders.
    #[must_use]
    pub const fn remove_unresolved(mut self, remove: bool) -> Self {
        self.remove_unresolved = remove;
        self
    }

    /// Registers the hook that runs before fallbacks.
    #[must_use]
    pub fn before_fallback(mut self, hook: &'h VarsHook<'h>) -> Self {
        self.before_fallback = Some(hook);
        self
    }

    /// Registers the hook that runs after fallbacks.
    #[must_use]
    pub fn after_fallback(mut self, hook: &'h VarsHook<'h>) -> Self {
        self.after_fallback = Some(hook);
        self
    }
}

impl std::fmt::Debug for ReplaceOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplaceOptions")
            .field("escape_html", &self.escape_html)
            .field("remove_unresolved", &self.remove_unresolved)
            .field("before_fallback", &self.before_fallback.is_some())
            .field("after_fallback", &self.after_fallback.is_some())
            .finish()
    }
}

/// Builds the table of built-in variables for the slots present in `ctx`.
#[must_use]
pub fn build_table(ctx: &MailContext<'_>) -> VarTable {
    MailVar::ALL
        .into_iter()
        .filter_map(|var| var.resolve(ctx).map(|value| (var.placeholder(), value)))
        .collect()
}

/// Replaces placeholders in `text` with values from `ctx`.
///
/// Never fails: unknown placeholders either stay as written or, with
/// [`ReplaceOptions::remove_unresolved`], disappear. Placeholders without
/// a dot in their path are never removed.
#[must_use]
pub fn replace_mail_vars(text: &str, ctx: &MailContext<'_>, options: &ReplaceOptions<'_>) -> String {
    let mut table = build_table(ctx);

    if let Some(hook) = options.before_fallback {
        trace!("Running before-fallback vars hook");
        table = hook(table, ctx);
    }

    apply_fallbacks(&mut table, text, options.remove_unresolved);

    if let Some(hook) = options.after_fallback {
        trace!("Running after-fallback vars hook");
        table = hook(table, ctx);
    }

    table.map_values(|value| format::format_value(value, options.escape_html));

    let result = table.substitute(text);

    if options.remove_unresolved {
        placeholder::strip_dotted(&result).trim().to_string()
    } else {
        result
    }
}

fn apply_fallbacks(table: &mut VarTable, text: &str, remove_unresolved: bool) {
    for found in placeholder::scan(text) {
        let key = found.key();
        let candidate = table
            .get(&key)
            .map(str::to_string)
            .or_else(|| found.fallback.clone());

        let value = match candidate {
            Some(value) => value,
            None if remove_unresolved && found.is_dotted() => {
                trace!("Removing unresolved placeholder {}", found.raw);
                String::new()
            }
            None => {
                trace!("Leaving unresolved placeholder {}", found.raw);
                continue;
            }
        };

        table.insert(found.raw, value.clone());
        table.insert(key, value);
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::similar_names
)]
mod tests {
    use super::*;

    struct Ticket;

    impl ConversationVars for Ticket {
        fn subject(&self) -> String {
            "Broken <widget>".into()
        }

        fn number(&self) -> Option<u64> {
            Some(77)
        }

        fn customer_email(&self) -> String {
            "ticket@example.com".into()
        }
    }

    struct Jane;

    impl CustomerVars for Jane {
        fn full_name(&self) -> String {
            "Jane Doe".into()
        }

        fn first_name(&self) -> String {
            "Jane".into()
        }

        fn last_name(&self) -> String {
            "Doe".into()
        }

        fn company(&self) -> String {
            "Acme\nLtd".into()
        }
    }

    struct Support;

    impl MailboxVars for Support {
        fn email(&self) -> String {
            "support@example.com".into()
        }

        fn name(&self) -> String {
            "Support".into()
        }

        fn mail_from(&self, user: Option<&dyn UserVars>) -> Option<MailFrom> {
            Some(MailFrom {
                name: user.map(|u| format!("{} (Support)", u.first_name())),
                address: "support@example.com".into(),
            })
        }
    }

    struct Agent;

    impl UserVars for Agent {
        fn full_name(&self) -> String {
            "Sam Agent".into()
        }

        fn first_name(&self) -> String {
            "Sam".into()
        }

        fn last_name(&self) -> String {
            "Agent".into()
        }

        fn phone(&self) -> String {
            "+1 555 0100".into()
        }

        fn email(&self) -> String {
            "sam@example.com".into()
        }

        fn job_title(&self) -> String {
            "Support Lead".into()
        }

        fn photo_url(&self) -> Option<String> {
            Some("https://example.com/sam.png".into())
        }
    }

    fn render(text: &str, ctx: &MailContext<'_>) -> String {
        replace_mail_vars(text, ctx, &ReplaceOptions::default())
    }

    #[test]
    fn test_full_context() {
        let ctx = MailContext::new()
            .with_conversation(&Ticket)
            .with_mailbox(&Support)
            .with_customer(&Jane)
            .with_user(&Agent);

        let text = concat!(
            "#{%conversation.number%} {%subject%} for {%customer.email%}; ",
            "{%customer.fullName%}/{%customer.firstName%}/{%customer.lastName%}; ",
            "{%mailbox.name%} <{%mailbox.email%}> as {%mailbox.fromName%}; ",
            "{%user.fullName%} {%user.jobTitle%} {%user.phone%} {%user.email%} ",
            "{%user.lastName%} {%user.photoUrl%}",
        );

        assert_eq!(
            render(text, &ctx),
            concat!(
                "#77 Broken <widget> for ticket@example.com; ",
                "Jane Doe/Jane/Doe; ",
                "Support <support@example.com> as Sam (Support); ",
                "Sam Agent Support Lead +1 555 0100 sam@example.com ",
                "Agent https://example.com/sam.png",
            )
        );
    }

    #[test]
    fn test_build_table_only_present_slots() {
        let ctx = MailContext::new().with_customer(&Jane);
        let table = build_table(&ctx);
        assert_eq!(table.len(), 4);
        assert_eq!(table.get("{%customer.firstName%}"), Some("Jane"));
        assert!(!table.contains("{%subject%}"));
    }

    #[test]
    fn test_newlines_converted() {
        let ctx = MailContext::new().with_customer(&Jane);
        assert_eq!(render("{%customer.company%}", &ctx), "Acme<br />\nLtd");
    }

    #[test]
    fn test_escape_html() {
        let ctx = MailContext::new().with_conversation(&Ticket);
        let options = ReplaceOptions::new().escape_html(true);
        assert_eq!(
            replace_mail_vars("<p>{%subject%}</p>", &ctx, &options),
            "<p>Broken &lt;widget&gt;</p>"
        );
    }

    #[test]
    fn test_template_text_is_never_escaped() {
        let options = ReplaceOptions::new().escape_html(true);
        assert_eq!(
            replace_mail_vars("<b>\n</b>", &MailContext::new(), &options),
            "<b>\n</b>"
        );
    }

    #[test]
    fn test_fallback_used_when_missing() {
        assert_eq!(render("{%missing.path,fallback=Hi%}", &MailContext::new()), "Hi");
    }

    #[test]
    fn test_fallback_ignored_when_resolved() {
        let ctx = MailContext::new().with_customer(&Jane);
        assert_eq!(
            render("Hello {%customer.firstName,fallback=there%}", &ctx),
            "Hello Jane"
        );
    }

    #[test]
    fn test_fallback_used_for_empty_slot_field_is_not_applied() {
        struct Nameless;
        impl CustomerVars for Nameless {}

        let ctx = MailContext::new().with_customer(&Nameless);
        assert_eq!(
            render("Hello {%customer.firstName,fallback=there%}!", &ctx),
            "Hello !"
        );
    }

    #[test]
    fn test_fallback_also_fills_bare_placeholder() {
        assert_eq!(
            render("{%a.b,fallback=X%} {%a.b%}", &MailContext::new()),
            "X X"
        );
    }

    #[test]
    fn test_unresolved_kept() {
        assert_eq!(render("{%missing.path%}", &MailContext::new()), "{%missing.path%}");
    }

    #[test]
    fn test_unresolved_removed_and_trimmed() {
        let options = ReplaceOptions::new().remove_unresolved(true);
        assert_eq!(
            replace_mail_vars("{%missing.path%}", &MailContext::new(), &options),
            ""
        );
        assert_eq!(
            replace_mail_vars("  Hi {%missing.path%}\n", &MailContext::new(), &options),
            "Hi"
        );
    }

    #[test]
    fn test_undotted_unresolved_survives_removal() {
        let options = ReplaceOptions::new().remove_unresolved(true);
        assert_eq!(
            replace_mail_vars("{%subject%} {%x.y%}", &MailContext::new(), &options),
            "{%subject%}"
        );
    }

    #[test]
    fn test_malformed_placeholders_pass_through() {
        let ctx = MailContext::new().with_customer(&Jane);
        let text = "{%customer.firstName {%customer_name%} %}";
        assert_eq!(render(text, &ctx), text);
    }

    #[test]
    fn test_mailbox_from_name_override() {
        let ctx = MailContext::new()
            .with_mailbox(&Support)
            .with_mailbox_from_name("Help Team");
        assert_eq!(render("{%mailbox.fromName%}", &ctx), "Help Team");
    }

    #[test]
    fn test_mailbox_from_name_without_user() {
        let ctx = MailContext::new().with_mailbox(&Support);
        assert_eq!(render("[{%mailbox.fromName%}]", &ctx), "[]");
    }

    #[test]
    fn test_before_fallback_hook_adds_vars() {
        fn add_company(mut table: VarTable, _: &MailContext<'_>) -> VarTable {
            table.insert("{%company.name%}", "Acme");
            table
        }

        let options = ReplaceOptions::new().before_fallback(&add_company);
        assert_eq!(
            replace_mail_vars("{%company.name,fallback=Us%}", &MailContext::new(), &options),
            "Acme"
        );
    }

    #[test]
    fn test_after_fallback_hook_overrides() {
        fn shorten_first_name(mut table: VarTable, ctx: &MailContext<'_>) -> VarTable {
            if ctx.customer.is_some() {
                table.insert("{%customer.firstName%}", "J.");
            }
            table
        }

        let ctx = MailContext::new().with_customer(&Jane);
        let options = ReplaceOptions::new().after_fallback(&shorten_first_name);
        assert_eq!(
            replace_mail_vars("{%customer.firstName%}", &ctx, &options),
            "J."
        );
    }

    #[test]
    fn test_output_is_stable_on_second_pass() {
        let ctx = MailContext::new().with_customer(&Jane).with_user(&Agent);
        let once = render("Hi {%customer.firstName%}, {%user.fullName%}", &ctx);
        assert_eq!(render(&once, &ctx), once);
    }
}
