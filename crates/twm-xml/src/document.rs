//! Tree types.

/// `<?xml ... ?>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

/// A parsed descriptor: declaration, surrounding misc nodes and one root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub declaration: Option<Declaration>,
    /// Comments, processing instructions, doctype and whitespace before the root.
    pub prolog: Vec<Node>,
    pub root: Element,
    /// Comments, processing instructions and whitespace after the root.
    pub epilog: Vec<Node>,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            declaration: None,
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Unescaped character data.
    Text(String),
    CData(String),
    /// Raw comment body.
    Comment(String),
    /// Raw processing instruction body (target and content).
    ProcessingInstruction(String),
    /// Raw doctype body.
    DocType(String),
}

/// Attribute with an unescaped value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Set an attribute, keeping its position when it already exists.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    /// Concatenated text and CDATA content of this element's direct children.
    ///
    /// Returns `None` when the element has no character data at all.
    pub fn text(&self) -> Option<String> {
        let mut text: Option<String> = None;
        for child in &self.children {
            if let Node::Text(value) | Node::CData(value) = child {
                text.get_or_insert_with(String::new).push_str(value);
            }
        }
        text
    }

    /// Replace all direct character data with a single text node.
    ///
    /// The new node takes the place of the first text/CDATA child, or is
    /// prepended when there was none.
    pub fn set_text(&mut self, value: impl Into<String>) {
        let position = self
            .children
            .iter()
            .position(|child| matches!(child, Node::Text(_) | Node::CData(_)))
            .unwrap_or(0);
        self.children
            .retain(|child| !matches!(child, Node::Text(_) | Node::CData(_)));
        let position = position.min(self.children.len());
        self.children.insert(position, Node::Text(value.into()));
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Visit every descendant element named `name`, in document order.
    ///
    /// Matching elements are visited before their own descendants. Elements
    /// named in `prune` are neither visited nor descended into.
    pub fn visit_descendants_mut<E, F>(
        &mut self,
        name: &str,
        prune: &[&str],
        visit: &mut F,
    ) -> Result<(), E>
    where
        F: FnMut(&mut Element) -> Result<(), E>,
    {
        for child in self.child_elements_mut() {
            if prune.contains(&child.name.as_str()) {
                continue;
            }
            if child.name == name {
                visit(child)?;
            }
            child.visit_descendants_mut(name, prune, visit)?;
        }
        Ok(())
    }

    /// Read-only counterpart of [`Element::visit_descendants_mut`].
    pub fn descendants<'a>(&'a self, name: &str, prune: &[&str], out: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if prune.contains(&child.name.as_str()) {
                continue;
            }
            if child.name == name {
                out.push(child);
            }
            child.descendants(name, prune, out);
        }
    }
}
