//! A small XML element tree on top of quick-xml.
//!
//! Package parts are read into [`Element`] trees, mapped onto the document
//! model, and written back from the tree. Qualified names are kept as
//! written (`w:p`, `r:id`), so namespace prefixes round-trip untouched.

use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};

/// XML declaration written at the top of every part.
pub(crate) const DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// A node in the tree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Element(Element),
    /// Unescaped character data
    Text(String),
    /// Markup written verbatim (comments, CDATA, pre-rendered fragments)
    Raw(String),
}

/// An element with its attributes and children.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Element {
    pub name: String,
    /// Attributes in document order, values unescaped
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Name without the namespace prefix.
    pub fn local_name(&self) -> &str {
        local(&self.name)
    }

    /// Attribute value by local name.
    pub fn attr(&self, local_name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| local(k) == local_name)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First child element with the given local name.
    pub fn child(&self, local_name: &str) -> Option<&Element> {
        self.elements().find(|e| e.local_name() == local_name)
    }

    /// First descendant (depth first, self excluded) with the given local name.
    pub fn find(&self, local_name: &str) -> Option<&Element> {
        for child in self.elements() {
            if child.local_name() == local_name {
                return Some(child);
            }
            if let Some(found) = child.find(local_name) {
                return Some(found);
            }
        }
        None
    }

    /// Mutable variant of [`Element::find`].
    pub fn find_mut(&mut self, local_name: &str) -> Option<&mut Element> {
        for child in self.children.iter_mut() {
            if let Node::Element(e) = child {
                if e.local_name() == local_name {
                    return Some(e);
                }
                if let Some(found) = e.find_mut(local_name) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Concatenated character data of direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|n| match n {
                Node::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Serialize this element and its subtree.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    pub fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

impl Node {
    pub fn write_to(&self, out: &mut String) {
        match self {
            Node::Element(e) => e.write_to(out),
            Node::Text(t) => out.push_str(&partial_escape(t.as_str())),
            Node::Raw(raw) => out.push_str(raw),
        }
    }

    /// Check if this is a text node holding only whitespace.
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Node::Text(t) if t.trim().is_empty())
    }
}

/// Strip a namespace prefix.
pub(crate) fn local(name: &str) -> &str {
    name.rsplit_once(':').map(|(_, l)| l).unwrap_or(name)
}

/// Parse a package part into its root element.
pub(crate) fn parse(part: &str, data: &[u8]) -> Result<Element> {
    let mut reader = Reader::from_reader(data);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => stack.push(start_element(part, &e)?),
            Ok(Event::Empty(e)) => {
                let element = start_element(part, &e)?;
                attach(&mut stack, &mut root, Node::Element(element));
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::xml(part, "unexpected closing tag"))?;
                attach(&mut stack, &mut root, Node::Element(element));
            }
            Ok(Event::Text(t)) => {
                if !stack.is_empty() {
                    let text = t.unescape().map_err(|e| Error::xml(part, e))?;
                    push_text(&mut stack, &text);
                }
            }
            Ok(Event::CData(c)) => {
                let raw = format!("<![CDATA[{}]]>", String::from_utf8_lossy(&c));
                attach(&mut stack, &mut root, Node::Raw(raw));
            }
            Ok(Event::Comment(c)) => {
                let raw = format!("<!--{}-->", String::from_utf8_lossy(&c));
                attach(&mut stack, &mut root, Node::Raw(raw));
            }
            // The declaration is rewritten on save.
            Ok(Event::Decl(_)) | Ok(Event::PI(_)) | Ok(Event::DocType(_)) => {}
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::xml(part, e)),
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(Error::xml(part, "unclosed element at end of part"));
    }
    root.ok_or_else(|| Error::xml(part, "part has no root element"))
}

fn start_element(part: &str, e: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()));
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::xml(part, err))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| Error::xml(part, err))?
            .into_owned();
        element.attrs.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            // Comments around the root are dropped.
            if let Node::Element(e) = node {
                if root.is_none() {
                    *root = Some(e);
                }
            }
        }
    }
}

fn push_text(stack: &mut [Element], text: &str) {
    if let Some(parent) = stack.last_mut() {
        if let Some(Node::Text(prev)) = parent.children.last_mut() {
            prev.push_str(text);
        } else {
            parent.children.push(Node::Text(text.to_string()));
        }
    }
}

/// Serialize a root element as a complete part.
pub(crate) fn to_part(root: &Element) -> Vec<u8> {
    let mut out = String::from(DECLARATION);
    out.push_str("\r\n");
    root.write_to(&mut out);
    out.into_bytes()
}
