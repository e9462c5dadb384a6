//! A small mutable XML element tree.
//!
//! Package parts are parsed into this tree by the loader, rewritten in place by
//! the font walker and serialized back by the saver. Names are kept exactly as
//! written (`a:latin`), so namespace declarations round-trip as ordinary
//! attributes; lookups go by local name.

/// A node inside an element's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// A nested element.
    Element(XmlElement),
    /// Character data, already unescaped.
    Text(String),
    /// Markup written back verbatim (comments, CDATA, processing instructions).
    Raw(String),
}

/// An XML element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    /// Qualified name as written in the source, e.g. `a:rPr`.
    pub name: String,

    /// Attributes in source order as `(qualified name, unescaped value)`.
    pub attributes: Vec<(String, String)>,

    /// Child nodes in document order.
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element with the given qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder: append a child element.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Builder: append a text node.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// The element name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Look up an attribute by its qualified name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The relationship id attribute (`r:id`), whatever prefix binds it.
    ///
    /// Unprefixed `id` attributes and namespace declarations never match.
    pub fn relationship_id(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.contains(':') && !key.starts_with("xmlns") && local_name(key) == "id")
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing its value in place or appending it.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Iterate over child elements, skipping text and raw nodes.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Iterate mutably over child elements.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Iterate over child elements with the given local name.
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |e| e.local_name() == local)
    }

    /// Iterate mutably over child elements with the given local name.
    pub fn children_named_mut<'a>(
        &'a mut self,
        local: &'a str,
    ) -> impl Iterator<Item = &'a mut XmlElement> {
        self.elements_mut().filter(move |e| e.local_name() == local)
    }

    /// First child element with the given local name.
    pub fn child(&self, local: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.local_name() == local)
    }

    /// First child element with the given local name, mutably.
    pub fn child_mut(&mut self, local: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|e| e.local_name() == local)
    }

    /// First descendant (excluding `self`) with the given local name, in document order.
    pub fn find(&self, local: &str) -> Option<&XmlElement> {
        for child in self.elements() {
            if child.local_name() == local {
                return Some(child);
            }
            if let Some(found) = child.find(local) {
                return Some(found);
            }
        }
        None
    }

    /// First descendant (excluding `self`) with the given local name, mutably.
    pub fn find_mut(&mut self, local: &str) -> Option<&mut XmlElement> {
        for child in self.elements_mut() {
            if child.local_name() == local {
                return Some(child);
            }
            if let Some(found) = child.find_mut(local) {
                return Some(found);
            }
        }
        None
    }

    /// Visit every descendant (excluding `self`) with the given local name in
    /// document order.
    ///
    /// Matches are not searched for nested matches of the same name.
    pub fn for_each_descendant_mut<F>(&mut self, local: &str, f: &mut F)
    where
        F: FnMut(&mut XmlElement),
    {
        for child in self.elements_mut() {
            if child.local_name() == local {
                f(child);
            } else {
                child.for_each_descendant_mut(local, f);
            }
        }
    }

    /// Concatenated character data of this element and all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(element) => element.collect_text(out),
                XmlNode::Raw(_) => {}
            }
        }
    }
}

/// One parsed package part: its name inside the package and its XML content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlPart {
    /// Part name inside the package, without a leading slash (`ppt/slides/slide1.xml`).
    pub name: String,

    /// Nodes before the root element (XML declaration, comments, whitespace).
    pub prolog: Vec<XmlNode>,

    /// The document element.
    pub root: XmlElement,

    /// Nodes after the root element.
    pub epilog: Vec<XmlNode>,
}

impl XmlPart {
    /// Create a part with no prolog or epilog.
    pub fn new(name: impl Into<String>, root: XmlElement) -> Self {
        Self {
            name: name.into(),
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }
}

/// Extract the local name from a potentially namespaced XML name.
pub fn local_name(name: &str) -> &str {
    match name.find(':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}
