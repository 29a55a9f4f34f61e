//! Shared types for the Tableau workbook migrator.

pub mod backend;
pub mod config;
pub mod error;
pub mod report;

pub use config::{ConfigFile, MigrationConfig};
pub use error::{ConfigError, Result};
pub use report::{DatasourceReport, DatasourceStatus, MigrationReport};
