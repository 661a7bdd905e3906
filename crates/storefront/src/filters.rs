//! Custom Askama template filters.

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Renders `**bold**` spans in a concierge reply as `<strong>`.
///
/// The input is HTML-escaped first, so the output is safe to mark `|safe`.
///
/// Usage in templates: `{{ message.text|emphasis|safe }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn emphasis(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(render_emphasis(&value.to_string()))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn render_emphasis(text: &str) -> String {
    let escaped = escape(text);
    let mut out = String::with_capacity(escaped.len());
    let mut segments = escaped.split("**").peekable();
    let mut bold = false;

    while let Some(segment) = segments.next() {
        if bold && segments.peek().is_some() {
            out.push_str("<strong>");
            out.push_str(segment);
            out.push_str("</strong>");
        } else if bold {
            // Unclosed marker stays literal.
            out.push_str("**");
            out.push_str(segment);
        } else {
            out.push_str(segment);
        }
        bold = !bold;
    }

    out
}
