//! CLI argument definitions for the workbook migrator.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use twm_model::ConfigFile;
use twm_package::DEFAULT_SUFFIX;

#[derive(Parser)]
#[command(
    name = "tableau-migrate",
    version,
    about = "Retarget Tableau workbooks from Redshift to Snowflake",
    long_about = "Retarget Tableau workbooks and datasources from Redshift to Snowflake.\n\n\
                  Rewrites embedded connections, uppercases table and column identifiers \
                  Snowflake can address unquoted, and updates calculated-field references.\n\
                  Accepts packaged (.twbx, .tdsx) and plain (.twb, .tds) files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -vvv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Migrate a workbook or datasource and write a suffixed copy.
    Migrate(MigrateArgs),

    /// List the datasources of a workbook without changing anything.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct MigrateArgs {
    /// Workbook or datasource to migrate (.twbx, .tdsx, .twb or .tds).
    #[arg(value_name = "PATH")]
    pub input: PathBuf,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Appended to the file name of the migrated copy.
    #[arg(long = "suffix", value_name = "SUFFIX", default_value = DEFAULT_SUFFIX)]
    pub suffix: String,

    /// Migrate in memory and report without writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Write the migration report and rename mapping as JSON.
    #[arg(long = "report-json", value_name = "PATH")]
    pub report_json: Option<PathBuf>,

    /// Print every identifier rename after the summary.
    #[arg(long = "show-renames")]
    pub show_renames: bool,
}

/// Snowflake connection settings.
///
/// Flags override values read from `--config`; every setting must end up
/// defined by one or the other.
#[derive(Args, Clone, Default)]
pub struct TargetArgs {
    /// TOML file with account, username, database, warehouse, schema and role.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Snowflake account identifier (host prefix).
    #[arg(long = "account", value_name = "ACCOUNT")]
    pub account: Option<String>,

    /// Snowflake user name.
    #[arg(long = "username", value_name = "USER")]
    pub username: Option<String>,

    /// Snowflake database.
    #[arg(long = "database", value_name = "DATABASE")]
    pub database: Option<String>,

    /// Snowflake warehouse.
    #[arg(long = "warehouse", value_name = "WAREHOUSE")]
    pub warehouse: Option<String>,

    /// Snowflake schema; replaces the Redshift default schema in table paths.
    #[arg(long = "schema", value_name = "SCHEMA")]
    pub schema: Option<String>,

    /// Snowflake role used for the connection.
    #[arg(long = "role", value_name = "ROLE")]
    pub role: Option<String>,
}

impl TargetArgs {
    /// Values given on the command line, as a partial config.
    pub fn overrides(&self) -> ConfigFile {
        ConfigFile {
            account: self.account.clone(),
            username: self.username.clone(),
            database: self.database.clone(),
            warehouse: self.warehouse.clone(),
            schema: self.schema.clone(),
            role: self.role.clone(),
        }
    }
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Workbook or datasource to inspect (.twbx, .tdsx, .twb or .tds).
    #[arg(value_name = "PATH")]
    pub input: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
