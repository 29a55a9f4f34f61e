//! Relation (table reference) rewriting.

use tracing::debug;

use twm_model::MigrationConfig;
use twm_model::backend::{SOURCE_DEFAULT_SCHEMA, retarget_token};
use twm_xml::Element;

use crate::error::{MigrateError, Result};
use crate::rename::RenameMapping;
use crate::tags::RELATION;

/// What happened to one `<relation>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationOutcome {
    /// No `connection` attribute (joins, unions): untouched.
    Skipped,
    /// Connection reference rewritten; no `table` attribute (custom SQL).
    ConnectionOnly,
    /// Connection, table and name rewritten; name recorded in the mapping.
    Renamed,
}

/// Rewrite a relation's connection reference, table and name.
///
/// Table and name are uppercased without checking whether they need
/// quoting. Only the name is recorded in `mapping`; the table attribute is
/// read by the driver and never referenced with brackets elsewhere.
pub fn normalize_relation(
    relation: &mut Element,
    config: &MigrationConfig,
    mapping: &mut RenameMapping,
) -> Result<RelationOutcome> {
    let Some(connection) = relation.attr("connection") else {
        return Ok(RelationOutcome::Skipped);
    };
    let connection = retarget_token(connection);
    relation.set_attr("connection", connection);

    let Some(table) = relation.attr("table") else {
        return Ok(RelationOutcome::ConnectionOnly);
    };
    let table = normalize_table(table, &config.schema);

    let original = relation
        .attr("name")
        .ok_or(MigrateError::MissingAttribute {
            element: RELATION,
            attribute: "name",
        })?
        .to_string();
    let normalized = original.to_uppercase();
    debug!(
        from_name = %original,
        to_name = %normalized,
        table = %table,
        "rewriting relation"
    );
    relation.set_attr("table", table);
    relation.set_attr("name", normalized.as_str());
    mapping.insert(original, normalized);
    Ok(RelationOutcome::Renamed)
}

/// Uppercase a table reference and swap Redshift's `PUBLIC` schema for the
/// configured one.
///
/// This is a literal substitution on the uppercased text, not a parse of the
/// schema qualifier: `[public].[orders]` becomes `[CORE].[ORDERS]`.
pub fn normalize_table(table: &str, schema: &str) -> String {
    table
        .to_uppercase()
        .replace(SOURCE_DEFAULT_SCHEMA, &schema.to_uppercase())
}
