//! HTML documents served to the buyer's browser.

use crate::models::session::PaymentFields;

/// Escapes text for use inside a double- or single-quoted HTML attribute or
/// element content.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders the page that posts `fields` to `action` as soon as it loads.
pub fn auto_submit_form(action: &str, fields: &PaymentFields) -> String {
    let inputs = fields
        .pairs()
        .iter()
        .map(|(name, value)| {
            format!(
                r#"      <input type="hidden" name="{}" value="{}" />"#,
                escape_html(name),
                escape_html(value)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!doctype html>
<html>
  <head><meta charset="utf-8"><title>Redirecting to PayU…</title></head>
  <body onload="document.forms[0].submit()" style="font-family: sans-serif">
    <p>Redirecting to PayU…</p>
    <form method="post" action="{action}">
{inputs}
      <noscript><button type="submit">Pay with PayU</button></noscript>
    </form>
  </body>
</html>"#,
        action = escape_html(action),
        inputs = inputs,
    )
}

/// Renders the buyer-facing result page echoing the processor's payload.
pub fn response_page(payload_json: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
  <head><meta charset="utf-8"><title>WebCheckout result</title></head>
  <body style="font-family: sans-serif">
    <h1>WebCheckout result</h1>
    <pre>{}</pre>
    <p><b>Note:</b> this page is for the buyer. The canonical confirmation arrives at <code>/api/payu/confirm</code>.</p>
  </body>
</html>"#,
        escape_html(payload_json)
    )
}
