//! Element and attribute names of the Tableau descriptor format.

pub const DATASOURCE: &str = "datasource";
pub const NAMED_CONNECTION: &str = "named-connection";
pub const RELATION: &str = "relation";
pub const METADATA_RECORD: &str = "metadata-record";

pub const REMOTE_NAME: &str = "remote-name";
pub const REMOTE_ALIAS: &str = "remote-alias";
pub const PARENT_NAME: &str = "parent-name";

pub const HAS_CONNECTION: &str = "hasconnection";
pub const CLASS: &str = "class";
pub const COLUMN_CLASS: &str = "column";
