use std::path::PathBuf;

use serde::Serialize;

use twm_core::{DatasourceSummary, RenameMapping};
use twm_model::MigrationReport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameEntry {
    pub original: String,
    pub normalized: String,
}

impl RenameEntry {
    /// Entries in insertion order.
    pub fn from_mapping(mapping: &RenameMapping) -> Vec<Self> {
        mapping
            .iter()
            .map(|(original, normalized)| Self {
                original: original.to_string(),
                normalized: normalized.to_string(),
            })
            .collect()
    }
}

/// Outcome of `migrate`; also the `--report-json` document.
#[derive(Debug, Serialize)]
pub struct MigrateResult {
    pub input: PathBuf,
    /// Written file, `None` on a dry run.
    pub output: Option<PathBuf>,
    pub dry_run: bool,
    pub report: MigrationReport,
    pub renames: Vec<RenameEntry>,
}

#[derive(Debug)]
pub struct InspectResult {
    pub input: PathBuf,
    pub datasources: Vec<DatasourceSummary>,
}
