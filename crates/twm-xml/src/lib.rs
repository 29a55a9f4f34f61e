//! Order-preserving XML tree used to rewrite Tableau descriptors.
//!
//! The tree keeps attribute order, comments, processing instructions and
//! whitespace so that a parse/write cycle only changes what was mutated.

pub mod document;
pub mod error;
pub mod escape;
mod parse;
mod write;

pub use document::{Attribute, Declaration, Document, Element, Node};
pub use error::{Result, XmlError};
pub use parse::parse_document;
pub use write::write_document;
