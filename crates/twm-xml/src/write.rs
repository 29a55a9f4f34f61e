//! [`Document`] to text via quick-xml's writer.

use std::borrow::Cow;
use std::fmt::Display;

use quick_xml::Writer;
use quick_xml::events::attributes::Attribute as XmlAttribute;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::name::QName;

use crate::document::{Document, Element, Node};
use crate::error::{Result, XmlError};
use crate::escape::{escape_attribute, escape_text};

/// Serialize a document.
///
/// Attribute values are always double-quoted; elements without children are
/// written self-closing.
pub fn write_document(document: &Document) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    if let Some(decl) = &document.declaration {
        let decl = BytesDecl::new(
            &decl.version,
            decl.encoding.as_deref(),
            decl.standalone.as_deref(),
        );
        writer.write_event(Event::Decl(decl)).map_err(write_error)?;
    }
    for node in &document.prolog {
        write_node(&mut writer, node)?;
    }
    write_element(&mut writer, &document.root)?;
    for node in &document.epilog {
        write_node(&mut writer, node)?;
    }
    String::from_utf8(writer.into_inner()).map_err(|_| XmlError::Encoding { context: "output" })
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for attr in &element.attributes {
        start.push_attribute(XmlAttribute {
            key: QName(attr.name.as_bytes()),
            value: Cow::Owned(escape_attribute(&attr.value).into_bytes()),
        });
    }
    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_error);
    }
    writer.write_event(Event::Start(start)).map_err(write_error)?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(write_error)
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<()> {
    let event = match node {
        Node::Element(element) => return write_element(writer, element),
        Node::Text(text) => Event::Text(BytesText::from_escaped(escape_text(text))),
        Node::CData(data) => Event::CData(BytesCData::new(data.as_str())),
        Node::Comment(comment) => Event::Comment(BytesText::from_escaped(comment.as_str())),
        Node::ProcessingInstruction(body) => Event::PI(BytesPI::new(body.as_str())),
        Node::DocType(body) => Event::DocType(BytesText::from_escaped(body.as_str())),
    };
    writer.write_event(event).map_err(write_error)
}

fn write_error(error: impl Display) -> XmlError {
    XmlError::Write(error.to_string())
}
