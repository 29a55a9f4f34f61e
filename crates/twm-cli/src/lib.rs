//! Command-line front end of the Tableau workbook migrator.
//!
//! The binary (`tableau-migrate`) only parses arguments and sets up logging;
//! the commands live here so integration tests can drive them directly.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
