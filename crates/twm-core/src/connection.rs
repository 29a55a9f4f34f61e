//! Named-connection and connection node rewriting.

use tracing::debug;

use twm_model::MigrationConfig;
use twm_model::backend::{SOURCE_CLASS, TARGET_CLASS, retarget_token};
use twm_xml::Element;

use crate::error::{MigrateError, Result};
use crate::tags::{CLASS, NAMED_CONNECTION};

/// Point one `<named-connection>` at the configured Snowflake account.
///
/// The caption becomes the Snowflake host and the name has its `redshift`
/// token swapped for `snowflake`. Every direct child whose `class` is
/// `redshift` is rewritten by [`rewrite_connection`]; children of any other
/// class are left alone. Returns the number of connections rewritten.
pub fn rewrite_named_connection(named: &mut Element, config: &MigrationConfig) -> Result<usize> {
    let name = named
        .attr("name")
        .ok_or(MigrateError::MissingAttribute {
            element: NAMED_CONNECTION,
            attribute: "name",
        })?
        .to_string();
    let caption = config.host();
    let renamed = retarget_token(&name);
    debug!(
        from_name = %name,
        from_caption = named.attr("caption").unwrap_or_default(),
        to_name = %renamed,
        to_caption = %caption,
        "rewriting named connection"
    );
    named.set_attr("caption", caption);
    named.set_attr("name", renamed);

    let mut rewritten = 0;
    for connection in named.child_elements_mut() {
        if connection.attr(CLASS) == Some(SOURCE_CLASS) {
            rewrite_connection(connection, config);
            rewritten += 1;
        }
    }
    Ok(rewritten)
}

/// Replace the Redshift attributes of a `<connection>` with Snowflake ones.
pub fn rewrite_connection(connection: &mut Element, config: &MigrationConfig) {
    connection.set_attr(CLASS, TARGET_CLASS);
    connection.set_attr("schema", config.schema.as_str());
    connection.set_attr("dbname", config.database.as_str());
    connection.set_attr("server", config.host());
    connection.set_attr("service", config.role.as_str());
    connection.set_attr("username", config.username.as_str());
    connection.set_attr("warehouse", config.warehouse.as_str());
    connection.set_attr("one-time-sql", config.initial_sql());
    // Snowflake connections carry no port.
    connection.set_attr("port", "");
}
