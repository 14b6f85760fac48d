//! Minimal TwiML rendering for webhook replies.

/// Content type Twilio expects for webhook responses.
pub const TWIML_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
}

/// Render `lines` as a single `<Message>` reply.
///
/// An empty slice produces an empty `<Response/>` so Twilio sends nothing.
pub fn message_response(lines: &[String]) -> String {
    let mut out = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    if lines.is_empty() {
        out.push_str("<Response/>");
        return out;
    }
    out.push_str("<Response><Message>");
    escape_into(&mut out, &lines.join("\n"));
    out.push_str("</Message></Response>");
    out
}
