//! Per-datasource outcome of a migration run.

use serde::{Deserialize, Serialize};

/// Whether a datasource was rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasourceStatus {
    Migrated,
    /// `hasconnection="false"`: published or external source, left as-is.
    SkippedNoConnection,
}

impl DatasourceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Migrated => "migrated",
            Self::SkippedNoConnection => "skipped (no connection)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasourceReport {
    /// `name` attribute of the datasource, if any.
    pub name: Option<String>,
    /// `caption` attribute of the datasource, if any.
    pub caption: Option<String>,
    pub status: DatasourceStatus,
    pub named_connections: usize,
    pub connections_rewritten: usize,
    pub relations_renamed: usize,
    pub columns_renamed: usize,
    /// Remote names/aliases left alone because they need quoting.
    pub columns_kept: usize,
}

impl DatasourceReport {
    pub fn new(
        name: Option<String>,
        caption: Option<String>,
        status: DatasourceStatus,
    ) -> Self {
        Self {
            name,
            caption,
            status,
            named_connections: 0,
            connections_rewritten: 0,
            relations_renamed: 0,
            columns_renamed: 0,
            columns_kept: 0,
        }
    }

    /// Caption when present, otherwise the internal name.
    pub fn display_name(&self) -> &str {
        self.caption
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("(unnamed)")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    pub datasources: Vec<DatasourceReport>,
    /// Number of entries in the rename mapping.
    pub rename_count: usize,
}

impl MigrationReport {
    pub fn migrated_count(&self) -> usize {
        self.datasources
            .iter()
            .filter(|ds| ds.status == DatasourceStatus::Migrated)
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.datasources.len() - self.migrated_count()
    }

    pub fn connections_rewritten(&self) -> usize {
        self.datasources
            .iter()
            .map(|ds| ds.connections_rewritten)
            .sum()
    }
}
