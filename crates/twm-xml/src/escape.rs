//! Escaping used by the serializer.
//!
//! Exposed so that text-level passes over serialized output can match values
//! exactly as the writer emitted them.

use quick_xml::escape::escape;

/// Escape an attribute value.
///
/// Markup characters become entity references; tab, newline and carriage
/// return become character references so that attribute-value normalization
/// on the next read does not fold them into spaces.
pub fn escape_attribute(value: &str) -> String {
    let escaped = escape(value);
    if !escaped.contains(['\t', '\n', '\r']) {
        return escaped.into_owned();
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for ch in escaped.chars() {
        match ch {
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            other => out.push(other),
        }
    }
    out
}

/// Escape character data.
pub fn escape_text(value: &str) -> String {
    let escaped = escape(value);
    if escaped.contains('\r') {
        escaped.replace('\r', "&#13;")
    } else {
        escaped.into_owned()
    }
}
