//! quick-xml event stream to [`Document`].

use std::borrow::Cow;
use std::fmt::Display;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use crate::document::{Attribute, Declaration, Document, Element, Node};
use crate::error::{Result, XmlError};

/// Parse a descriptor into an order-preserving tree.
///
/// Entity and character references are resolved; values are stored
/// unescaped. Whitespace text is kept as-is.
pub fn parse_document(input: &str) -> Result<Document> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(false);

    let mut builder = TreeBuilder::default();
    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event()
            .map_err(|error| malformed(position, error))?;
        match event {
            Event::Decl(decl) => {
                let version = decl.version().map_err(|e| malformed(position, e))?;
                let encoding = decl
                    .encoding()
                    .transpose()
                    .map_err(|e| malformed(position, e))?;
                let standalone = decl
                    .standalone()
                    .transpose()
                    .map_err(|e| malformed(position, e))?;
                builder.declaration = Some(Declaration {
                    version: utf8(&version, "declaration")?.to_string(),
                    encoding: encoding
                        .map(|value| utf8(&value, "declaration").map(str::to_string))
                        .transpose()?,
                    standalone: standalone
                        .map(|value| utf8(&value, "declaration").map(str::to_string))
                        .transpose()?,
                });
            }
            Event::Start(start) => {
                builder.flush_text(position)?;
                builder.stack.push(element_from(&start, position)?);
            }
            Event::Empty(start) => {
                builder.flush_text(position)?;
                let element = element_from(&start, position)?;
                builder.push_node(Node::Element(element), position)?;
            }
            Event::End(_) => {
                builder.flush_text(position)?;
                let element = builder.stack.pop().ok_or_else(|| XmlError::Malformed {
                    position,
                    message: "closing tag without an open element".to_string(),
                })?;
                builder.push_node(Node::Element(element), position)?;
            }
            Event::Text(text) => {
                let raw = utf8(&text, "text")?;
                let value = unescape(raw).map_err(|e| malformed(position, e))?;
                builder.text.push_str(&value);
            }
            Event::GeneralRef(reference) => {
                let name = utf8(&reference, "entity reference")?;
                let entity = format!("&{name};");
                let value = unescape(&entity).map_err(|e| malformed(position, e))?;
                builder.text.push_str(&value);
            }
            Event::CData(data) => {
                builder.flush_text(position)?;
                let value = utf8(&data, "CDATA section")?.to_string();
                builder.push_node(Node::CData(value), position)?;
            }
            Event::Comment(comment) => {
                builder.flush_text(position)?;
                let value = utf8(&comment, "comment")?.to_string();
                builder.push_node(Node::Comment(value), position)?;
            }
            Event::PI(instruction) => {
                builder.flush_text(position)?;
                let value = utf8(&instruction, "processing instruction")?.to_string();
                builder.push_node(Node::ProcessingInstruction(value), position)?;
            }
            Event::DocType(doctype) => {
                builder.flush_text(position)?;
                let value = utf8(&doctype, "doctype")?.to_string();
                builder.push_node(Node::DocType(value), position)?;
            }
            Event::Eof => {
                let position = reader.buffer_position() as u64;
                builder.flush_text(position)?;
                break;
            }
        }
    }
    builder.finish()
}

#[derive(Default)]
struct TreeBuilder {
    declaration: Option<Declaration>,
    prolog: Vec<Node>,
    root: Option<Element>,
    epilog: Vec<Node>,
    stack: Vec<Element>,
    /// Character data accumulated across text and reference events.
    text: String,
}

impl TreeBuilder {
    fn flush_text(&mut self, position: u64) -> Result<()> {
        if self.text.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(&mut self.text);
        self.push_node(Node::Text(text), position)
    }

    fn push_node(&mut self, node: Node, position: u64) -> Result<()> {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
            return Ok(());
        }
        match node {
            Node::Element(element) => {
                if self.root.is_some() {
                    return Err(XmlError::OutsideRoot { position });
                }
                self.root = Some(element);
            }
            Node::Text(ref text) | Node::CData(ref text) if !text.trim().is_empty() => {
                return Err(XmlError::OutsideRoot { position });
            }
            other => {
                if self.root.is_some() {
                    self.epilog.push(other);
                } else {
                    self.prolog.push(other);
                }
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Document> {
        if let Some(open) = self.stack.pop() {
            return Err(XmlError::Unclosed { name: open.name });
        }
        let root = self.root.ok_or(XmlError::MissingRoot)?;
        Ok(Document {
            declaration: self.declaration,
            prolog: self.prolog,
            root,
            epilog: self.epilog,
        })
    }
}

fn element_from(start: &BytesStart<'_>, position: u64) -> Result<Element> {
    let name = utf8(start.name().as_ref(), "element name")?.to_string();
    let mut element = Element::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| malformed(position, e))?;
        let key = utf8(attr.key.as_ref(), "attribute name")?.to_string();
        let raw = normalize_attribute_whitespace(utf8(&attr.value, "attribute value")?);
        let value = unescape(&raw).map_err(|e| malformed(position, e))?;
        element.attributes.push(Attribute {
            name: key,
            value: value.into_owned(),
        });
    }
    Ok(element)
}

/// Literal line breaks and tabs in an attribute value read as one space each;
/// `\r\n` counts as a single line break. Character references are untouched.
fn normalize_attribute_whitespace(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['\t', '\n', '\r']) {
        return Cow::Borrowed(raw);
    }
    Cow::Owned(
        raw.replace("\r\n", " ")
            .replace(['\t', '\n', '\r'], " "),
    )
}

fn utf8<'a>(bytes: &'a [u8], context: &'static str) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|_| XmlError::Encoding { context })
}

fn malformed(position: u64, error: impl Display) -> XmlError {
    XmlError::Malformed {
        position,
        message: error.to_string(),
    }
}
