//! Identifier migration engine.
//!
//! Rewrites the Redshift connections of every embedded datasource in a
//! Tableau descriptor to Snowflake, uppercases table and column identifiers
//! that Snowflake can address unquoted, and carries each rename through to
//! the bracketed references in calculated fields.
//!
//! The work happens in two passes: [`rewrite_tree`] mutates the parsed tree
//! and builds a [`RenameMapping`]; [`propagate_references`] then applies the
//! mapping to the serialized text. [`migrate_document`] runs both.

pub mod case_fold;
pub mod connection;
pub mod error;
pub mod inspect;
pub mod metadata;
pub mod migrate;
pub mod propagate;
pub mod relation;
pub mod rename;
mod tags;

pub use case_fold::{FoldedIdentifier, fold_identifier};
pub use error::{MigrateError, Result};
pub use inspect::{DatasourceSummary, inspect_document};
pub use migrate::{
    MigrationOutcome, Rewrite, has_embedded_connection, migrate_document, migrate_xml,
    rewrite_tree,
};
pub use propagate::propagate_references;
pub use rename::RenameMapping;
