//! Second pass: carry renames into bracketed references in the serialized text.
//!
//! Formula bodies are not parsed; every `[original]` in the text becomes
//! `[normalized]`. Matching is literal, so an original that also appears
//! bracketed in an unrelated context is rewritten there too.

use tracing::{debug, trace};

use twm_xml::escape::{escape_attribute, escape_text};

use crate::rename::RenameMapping;

/// Replace every `[original]` with `[normalized]` for each mapping entry.
///
/// Entries are applied one at a time in [`RenameMapping::application_order`].
/// Both sides are escaped the way the serializer escapes attribute values and
/// character data, so identifiers containing markup characters or whitespace
/// match their written form in either place.
pub fn propagate_references(text: &str, mapping: &RenameMapping) -> String {
    let mut document = text.to_string();
    for (original, normalized) in mapping.application_order() {
        if original == normalized {
            continue;
        }
        let mut occurrences = 0;
        for (from, to) in serialized_forms(original, normalized) {
            let found = document.matches(from.as_str()).count();
            if found > 0 {
                occurrences += found;
                document = document.replace(&from, &to);
            }
        }
        if occurrences == 0 {
            trace!(original, "no bracketed references");
        } else {
            debug!(original, normalized, occurrences, "propagated rename");
        }
    }
    document
}

/// `[original]` / `[normalized]` as written inside attributes and inside text.
fn serialized_forms(original: &str, normalized: &str) -> Vec<(String, String)> {
    let attribute = (
        format!("[{}]", escape_attribute(original)),
        format!("[{}]", escape_attribute(normalized)),
    );
    let text = (
        format!("[{}]", escape_text(original)),
        format!("[{}]", escape_text(normalized)),
    );
    if text == attribute {
        vec![attribute]
    } else {
        vec![attribute, text]
    }
}
