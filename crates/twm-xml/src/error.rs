use thiserror::Error;

/// Errors raised while reading or writing a descriptor.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The descriptor is not well-formed XML.
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    #[error("document has no root element")]
    MissingRoot,

    #[error("unexpected content outside the root element at byte {position}")]
    OutsideRoot { position: u64 },

    #[error("unclosed element <{name}>")]
    Unclosed { name: String },

    #[error("invalid UTF-8 in {context}")]
    Encoding { context: &'static str },

    #[error("failed to serialize document: {0}")]
    Write(String),
}

pub type Result<T> = std::result::Result<T, XmlError>;
