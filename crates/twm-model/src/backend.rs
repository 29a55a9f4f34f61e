//! Backend tokens used when rewriting connection definitions.

/// `class` attribute of a Redshift connection node.
pub const SOURCE_CLASS: &str = "redshift";

/// `class` attribute of a Snowflake connection node.
pub const TARGET_CLASS: &str = "snowflake";

/// Redshift's default schema, as it appears after uppercasing a table reference.
pub const SOURCE_DEFAULT_SCHEMA: &str = "PUBLIC";

/// Appended to the account identifier to form the Snowflake host.
pub const TARGET_HOST_SUFFIX: &str = ".snowflakecomputing.com";

/// Replace every literal source backend token with the target token.
///
/// Used for named-connection names and relation connection references, which
/// embed the backend class (e.g. `redshift.0a1b2c`).
pub fn retarget_token(value: &str) -> String {
    value.replace(SOURCE_CLASS, TARGET_CLASS)
}
