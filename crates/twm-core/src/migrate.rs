//! Orchestration of the tree pass and the text pass.

use tracing::{debug, info, info_span};

use twm_model::{DatasourceReport, DatasourceStatus, MigrationConfig, MigrationReport};
use twm_xml::{Document, Element, parse_document, write_document};

use crate::connection::rewrite_named_connection;
use crate::error::Result;
use crate::metadata::normalize_metadata_record;
use crate::propagate::propagate_references;
use crate::relation::{RelationOutcome, normalize_relation};
use crate::rename::RenameMapping;
use crate::tags::{DATASOURCE, HAS_CONNECTION, METADATA_RECORD, NAMED_CONNECTION, RELATION};

/// Result of the tree pass.
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub mapping: RenameMapping,
    pub report: MigrationReport,
}

/// Result of a full migration: rewritten text plus what was renamed.
#[derive(Debug, Clone)]
pub struct MigrationOutcome {
    pub text: String,
    pub mapping: RenameMapping,
    pub report: MigrationReport,
}

/// False only when `hasconnection` says the datasource is published or
/// otherwise external (`false` or `0`); absent means embedded.
pub fn has_embedded_connection(datasource: &Element) -> bool {
    match datasource.attr(HAS_CONNECTION) {
        None => true,
        Some(value) => {
            let value = value.trim();
            !(value.eq_ignore_ascii_case("false") || value == "0")
        }
    }
}

/// Rewrite every embedded datasource in document order and collect renames.
///
/// The root itself may be a datasource (`.tds` files). Nested datasources are
/// handled on their own and are not touched by their parent's rewrite.
pub fn rewrite_tree(document: &mut Document, config: &MigrationConfig) -> Result<Rewrite> {
    let mut mapping = RenameMapping::new();
    let mut datasources = Vec::new();
    visit_datasources(&mut document.root, config, &mut mapping, &mut datasources)?;
    let report = MigrationReport {
        datasources,
        rename_count: mapping.len(),
    };
    Ok(Rewrite { mapping, report })
}

/// Run both passes over a parsed document.
pub fn migrate_document(
    mut document: Document,
    config: &MigrationConfig,
) -> Result<MigrationOutcome> {
    let Rewrite { mapping, report } = rewrite_tree(&mut document, config)?;
    let serialized = write_document(&document)?;
    drop(document);
    let text = propagate_references(&serialized, &mapping);
    info!(
        datasources = report.datasources.len(),
        migrated = report.migrated_count(),
        skipped = report.skipped_count(),
        renames = mapping.len(),
        "descriptor migrated"
    );
    Ok(MigrationOutcome {
        text,
        mapping,
        report,
    })
}

/// Parse descriptor text and run both passes.
pub fn migrate_xml(text: &str, config: &MigrationConfig) -> Result<MigrationOutcome> {
    let document = parse_document(text)?;
    migrate_document(document, config)
}

fn visit_datasources(
    element: &mut Element,
    config: &MigrationConfig,
    mapping: &mut RenameMapping,
    reports: &mut Vec<DatasourceReport>,
) -> Result<()> {
    if element.is(DATASOURCE) {
        let report = rewrite_datasource(element, config, mapping)?;
        let skipped = report.status == DatasourceStatus::SkippedNoConnection;
        // Worksheet-level datasource references are empty stubs; not worth listing.
        if element.child_elements().next().is_some() {
            reports.push(report);
        }
        // Nothing below an external datasource is rewritten.
        if skipped {
            return Ok(());
        }
    }
    for child in element.child_elements_mut() {
        visit_datasources(child, config, mapping, reports)?;
    }
    Ok(())
}

fn rewrite_datasource(
    datasource: &mut Element,
    config: &MigrationConfig,
    mapping: &mut RenameMapping,
) -> Result<DatasourceReport> {
    let name = datasource.attr("name").map(str::to_string);
    let caption = datasource.attr("caption").map(str::to_string);
    let span = info_span!(
        "datasource",
        name = name.as_deref().unwrap_or_default(),
        caption = caption.as_deref().unwrap_or_default()
    );
    let _guard = span.enter();

    if !has_embedded_connection(datasource) {
        debug!("no embedded connection, skipping");
        return Ok(DatasourceReport::new(
            name,
            caption,
            DatasourceStatus::SkippedNoConnection,
        ));
    }
    let mut report = DatasourceReport::new(name, caption, DatasourceStatus::Migrated);
    let prune = [DATASOURCE];

    datasource.visit_descendants_mut(
        NAMED_CONNECTION,
        &prune,
        &mut |named: &mut Element| -> Result<()> {
            report.named_connections += 1;
            report.connections_rewritten += rewrite_named_connection(named, config)?;
            Ok(())
        },
    )?;

    datasource.visit_descendants_mut(RELATION, &prune, &mut |relation: &mut Element| -> Result<()> {
        if normalize_relation(relation, config, mapping)? == RelationOutcome::Renamed {
            report.relations_renamed += 1;
        }
        Ok(())
    })?;

    datasource.visit_descendants_mut(
        METADATA_RECORD,
        &prune,
        &mut |record: &mut Element| -> Result<()> {
            let counts = normalize_metadata_record(record, mapping)?;
            report.columns_renamed += counts.renamed;
            report.columns_kept += counts.kept;
            Ok(())
        },
    )?;

    if report.named_connections > 0 || report.relations_renamed > 0 {
        info!(
            connections = report.connections_rewritten,
            relations = report.relations_renamed,
            columns = report.columns_renamed,
            kept = report.columns_kept,
            "datasource rewritten"
        );
    }
    Ok(report)
}
