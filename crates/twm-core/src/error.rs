use thiserror::Error;

use twm_xml::XmlError;

#[derive(Debug, Error)]
pub enum MigrateError {
    /// The descriptor could not be parsed or serialized.
    #[error(transparent)]
    Xml(#[from] XmlError),

    /// An element the rewriters must modify lacks a required attribute.
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// A metadata field that is normalized has no text content.
    #[error("<{element}> has no text content")]
    MissingText { element: String },
}

pub type Result<T> = std::result::Result<T, MigrateError>;
