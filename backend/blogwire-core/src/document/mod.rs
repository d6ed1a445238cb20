//! Minimal namespace-aware XML tree for Atom feeds, entries and service
//! documents.
//!
//! Parsing resolves every element and attribute to `(namespace, local name)`
//! so callers never deal with prefixes. Serialization picks prefixes again:
//! the root namespace becomes the default one and the well-known Atom
//! companions get their customary prefixes (`app`, `dc`, `xhtml`).

mod reader;
mod writer;

pub use reader::parse;

/// Namespace URIs used across the Atom profiles.
pub mod ns {
    pub const ATOM_10: &str = "http://www.w3.org/2005/Atom";
    pub const ATOM_03: &str = "http://purl.org/atom/ns#";
    pub const APP_10: &str = "http://www.w3.org/2007/app";
    pub const APP_DRAFT: &str = "http://purl.org/atom/app#";
    pub const APP_03: &str = "http://example.net/appns/";
    pub const DC: &str = "http://purl.org/dc/elements/1.1/";
    pub const XHTML: &str = "http://www.w3.org/1999/xhtml";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub ns: Option<String>,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    ns: Option<String>,
    name: String,
    attrs: Vec<Attribute>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(ns: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            ns: ns.map(str::to_string),
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Element in namespace `ns`.
    pub fn in_ns(ns: &str, name: impl Into<String>) -> Self {
        Self::new(Some(ns), name)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.ns.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.name
    }

    pub fn is(&self, ns: &str, name: &str) -> bool {
        self.ns.as_deref() == Some(ns) && self.name == name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attrs
    }

    /// Unqualified attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.ns.is_none() && a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn attr_ns(&self, ns: &str, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.ns.as_deref() == Some(ns) && a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.set_attr_in(None, name, value);
    }

    pub fn set_attr_in(&mut self, ns: Option<&str>, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attrs
            .iter_mut()
            .find(|a| a.ns.as_deref() == ns && a.name == name)
        {
            Some(existing) => existing.value = value,
            None => self.attrs.push(Attribute {
                ns: ns.map(str::to_string),
                name: name.to_string(),
                value,
            }),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|a| !(a.ns.is_none() && a.name == name));
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.children.push(Node::Text(text));
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.children
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    pub fn child(&self, ns: &str, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.is(ns, name))
    }

    pub fn child_mut(&mut self, ns: &str, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|e| e.is(ns, name))
    }

    pub fn children_named<'a>(
        &'a self,
        ns: &'a str,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |e| e.is(ns, name))
    }

    pub fn remove_children(&mut self, ns: &str, name: &str) {
        self.retain_elements(|e| !e.is(ns, name));
    }

    /// Keep child elements matching `keep`; text nodes always stay.
    pub fn retain_elements(&mut self, mut keep: impl FnMut(&Element) -> bool) {
        self.children.retain(|node| match node {
            Node::Element(element) => keep(element),
            Node::Text(_) => true,
        });
    }

    /// Concatenated text of all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Trimmed text of the first `ns:name` child, `None` when absent or blank.
    pub fn child_text(&self, ns: &str, name: &str) -> Option<String> {
        self.child(ns, name)
            .map(|c| c.text().trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Markup of the children, serialized with this element's namespace
    /// as the default one.
    pub fn inner_xml(&self) -> String {
        writer::write_children(self)
    }

    /// Complete document with an XML declaration.
    pub fn to_xml(&self) -> String {
        writer::write_document(self)
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for node in &element.children {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(child) => collect_text(child, out),
        }
    }
}
