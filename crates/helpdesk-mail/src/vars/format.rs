//! Value formatting for rendered variables.

/// Escapes `&`, `<`, `>`, `"` and `'` as HTML entities.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Inserts `<br />` before every line break.
///
/// `\r\n`, `\n\r`, `\n` and `\r` each count as one break; the break
/// characters themselves are kept.
#[must_use]
pub fn nl2br(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\r' | '\n' => {
                out.push_str("<br />");
                out.push(ch);
                let pair = if ch == '\r' { '\n' } else { '\r' };
                if chars.peek() == Some(&pair) {
                    out.push(pair);
                    chars.next();
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Formats a value for insertion into a template body.
#[must_use]
pub fn format_value(value: &str, escape: bool) -> String {
    if escape {
        nl2br(&escape_html(value))
    } else {
        nl2br(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x" & 'y')</script>"#),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#039;y&#039;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_nl2br() {
        assert_eq!(nl2br("a\nb"), "a<br />\nb");
        assert_eq!(nl2br("a\r\nb"), "a<br />\r\nb");
        assert_eq!(nl2br("a\n\rb"), "a<br />\n\rb");
        assert_eq!(nl2br("a\n\nb"), "a<br />\n<br />\nb");
        assert_eq!(nl2br("a\rb"), "a<br />\rb");
        assert_eq!(nl2br(""), "");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value("<b>\n", true), "&lt;b&gt;<br />\n");
        assert_eq!(format_value("<b>\n", false), "<b><br />\n");
    }
}
