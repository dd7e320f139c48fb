//! Property tests for the mail helpers.

#![allow(clippy::unwrap_used, missing_docs)]

use helpdesk_mail::vars::{CustomerVars, MailContext, ReplaceOptions, replace_mail_vars};
use helpdesk_mail::{generate_message_id, is_auto_responder, message_id_hash};
use proptest::prelude::*;

struct Customer {
    full_name: String,
}

impl CustomerVars for Customer {
    fn full_name(&self) -> String {
        self.full_name.clone()
    }
}

fn header_value() -> impl Strategy<Value = String> {
    "[ -~]{0,40}"
}

proptest! {
    #[test]
    fn autoreply_header_always_detected(before in header_value(), value in header_value()) {
        let blob = format!("Subject: {before}\nX-Autoreply: {value}\n");
        prop_assert!(is_auto_responder(Some(blob.as_str())));
    }

    #[test]
    fn bulk_precedence_always_detected(
        value in prop::sample::select(vec!["bulk", "junk", "list", "auto_reply"]),
        pad in " {0,3}",
    ) {
        let blob = format!("From: a@example.com\r\nPrecedence:{pad}{value}{pad}\r\n");
        prop_assert!(is_auto_responder(Some(blob.as_str())));
    }

    #[test]
    fn plain_headers_never_detected(subject in "[a-zA-Z0-9 ]{0,40}") {
        let blob = format!("From: a@example.com\nSubject: {subject}\nPrecedence: normal");
        prop_assert!(!is_auto_responder(Some(blob.as_str())));
    }

    #[test]
    fn customer_full_name_rendered(name in "[a-zA-Z ]{0,30}") {
        let customer = Customer { full_name: name.clone() };
        let ctx = MailContext::new().with_customer(&customer);
        let text = replace_mail_vars("{%customer.fullName%}", &ctx, &ReplaceOptions::default());
        prop_assert_eq!(text, name);
    }

    #[test]
    fn fallback_used_without_context(path in "[a-z]{1,8}\\.[a-z]{1,8}", fallback in "[a-zA-Z0-9 ]{1,20}") {
        let template = format!("{{%{path},fallback={fallback}%}}");
        let text = replace_mail_vars(&template, &MailContext::new(), &ReplaceOptions::default());
        prop_assert_eq!(text, fallback);
    }

    #[test]
    fn unresolved_dotted_removed(path in "[a-z]{1,8}\\.[a-zA-Z]{1,8}") {
        let template = format!("{{%{path}%}}");
        let kept = replace_mail_vars(&template, &MailContext::new(), &ReplaceOptions::default());
        prop_assert_eq!(&kept, &template);

        let options = ReplaceOptions::new().remove_unresolved(true);
        let removed = replace_mail_vars(&template, &MailContext::new(), &options);
        prop_assert_eq!(removed, "");
    }

    #[test]
    fn rendering_is_idempotent(name in "[a-zA-Z ]{0,30}", prefix in "[a-zA-Z ,.!]{0,30}") {
        let customer = Customer { full_name: name };
        let ctx = MailContext::new().with_customer(&customer);
        let options = ReplaceOptions::default();
        let once = replace_mail_vars(&format!("{prefix}{{%customer.fullName%}}"), &ctx, &options);
        let twice = replace_mail_vars(&once, &ctx, &options);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn escaped_values_contain_no_raw_markup(inner in "[a-z]{1,10}") {
        let customer = Customer { full_name: format!("<{inner}>") };
        let ctx = MailContext::new().with_customer(&customer);
        let options = ReplaceOptions::new().escape_html(true);
        let text = replace_mail_vars("{%customer.fullName%}", &ctx, &options);
        prop_assert_eq!(text, format!("&lt;{inner}&gt;"));
    }

    #[test]
    fn message_id_deterministic_for_body(body in ".{1,200}", user in "[a-z]{1,10}", host in "[a-z]{1,10}\\.com") {
        let address = format!("{user}@{host}");
        let first = generate_message_id(&address, &body);
        prop_assert_eq!(&first, &generate_message_id(&address, &body));
        prop_assert!(first.starts_with("fs-"));
        let suffix = format!("@{host}");
        prop_assert!(first.ends_with(&suffix));
    }

    #[test]
    fn message_id_hash_is_hex_digest(thread_id in any::<u64>(), key in "[ -~]{1,40}") {
        let hash = message_id_hash(thread_id, &key);
        prop_assert_eq!(hash.len(), 32);
        prop_assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

#[test]
fn random_message_ids_differ() {
    let first = generate_message_id("user@example.com", "");
    let second = generate_message_id("user@example.com", "");
    assert_ne!(first, second);
}

#[test]
fn script_tag_escaped() {
    let customer = Customer {
        full_name: "<script>alert(1)</script>".into(),
    };
    let ctx = MailContext::new().with_customer(&customer);
    let options = ReplaceOptions::new().escape_html(true);
    let text = replace_mail_vars("{%customer.fullName%}", &ctx, &options);
    assert!(text.contains("&lt;script&gt;"));
}
