//! Column metadata record rewriting.

use tracing::debug;

use twm_xml::Element;

use crate::case_fold::fold_identifier;
use crate::error::{MigrateError, Result};
use crate::rename::RenameMapping;
use crate::tags::{CLASS, COLUMN_CLASS, PARENT_NAME, REMOTE_ALIAS, REMOTE_NAME};

/// Tally of the fields touched in one metadata record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetadataCounts {
    /// Remote names/aliases uppercased and recorded.
    pub renamed: usize,
    /// Remote names/aliases left as-is because they need quoting.
    pub kept: usize,
    pub parents: usize,
}

/// Normalize the fields of a `<metadata-record class="column">`.
///
/// `remote-name` and `remote-alias` go through the case-folding policy and
/// eligible values are recorded in `mapping`. `parent-name` is uppercased
/// unconditionally and never recorded. Records of any other class are
/// ignored.
pub fn normalize_metadata_record(
    record: &mut Element,
    mapping: &mut RenameMapping,
) -> Result<MetadataCounts> {
    let mut counts = MetadataCounts::default();
    if record.attr(CLASS) != Some(COLUMN_CLASS) {
        return Ok(counts);
    }
    for field in record.child_elements_mut() {
        match field.name.as_str() {
            REMOTE_NAME | REMOTE_ALIAS => {
                let original = field_text(field)?;
                let folded = fold_identifier(&original);
                debug!(
                    field = %field.name,
                    from = %original,
                    to = %folded.normalized,
                    "normalizing column identifier"
                );
                if folded.eligible {
                    field.set_text(folded.normalized.as_str());
                    mapping.insert(original, folded.normalized);
                    counts.renamed += 1;
                } else {
                    counts.kept += 1;
                }
            }
            PARENT_NAME => {
                let parent = field_text(field)?;
                field.set_text(parent.to_uppercase());
                counts.parents += 1;
            }
            _ => {}
        }
    }
    Ok(counts)
}

fn field_text(field: &Element) -> Result<String> {
    field.text().ok_or_else(|| MigrateError::MissingText {
        element: field.name.clone(),
    })
}
