use crate::error::{DocumentError, Result};
use quick_xml::events::{BytesCData, BytesDecl, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fs;
use std::path::Path;

/// One node of the document tree.
///
/// Text is stored unescaped; CDATA payload is stored raw and re-emitted
/// as a CDATA section on write, so reserved marker sequences inside it
/// (`<@...`) survive a load/save round-trip byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
}

/// A mutable XML element: name, attributes in document order, children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// First child element with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|e| e.name == name)
    }

    /// All child elements with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name == name)
    }

    pub fn children_named_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut Element> {
        self.elements_mut().filter(move |e| e.name == name)
    }

    /// All child elements, any name.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn push_element(&mut self, element: Element) -> &mut Element {
        self.children.push(Node::Element(element));
        match self.children.last_mut() {
            Some(Node::Element(e)) => e,
            _ => unreachable!(),
        }
    }

    /// Insert an element before the first child element named `anchor`;
    /// appends when no such child exists.
    pub fn insert_element_before(&mut self, anchor: &str, element: Element) -> &mut Element {
        let idx = self
            .children
            .iter()
            .position(|n| matches!(n, Node::Element(e) if e.name == anchor))
            .unwrap_or(self.children.len());
        self.children.insert(idx, Node::Element(element));
        match &mut self.children[idx] {
            Node::Element(e) => e,
            _ => unreachable!(),
        }
    }

    /// Drop child elements with the given name failing the predicate;
    /// every other node is kept untouched.
    pub fn retain_elements<F>(&mut self, name: &str, mut keep: F)
    where
        F: FnMut(&Element) -> bool,
    {
        self.children.retain(|n| match n {
            Node::Element(e) if e.name == name => keep(e),
            _ => true,
        });
    }

    /// Concatenated text and CDATA payload of direct children.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            match node {
                Node::Text(t) | Node::CData(t) => out.push_str(t),
                _ => {}
            }
        }
        out
    }

    /// Replace all text content with a single CDATA section.
    pub fn set_cdata(&mut self, text: impl Into<String>) {
        self.children
            .retain(|n| !matches!(n, Node::Text(_) | Node::CData(_)));
        self.children.push(Node::CData(text.into()));
    }

    /// Depth-first iteration over this element and all descendants with
    /// the given name.
    pub fn descendants_named<'a>(&'a self, name: &'a str) -> Vec<&'a Element> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(el) = stack.pop() {
            if el.name == name {
                out.push(el);
            }
            // reverse keeps document order in the output
            stack.extend(el.elements().collect::<Vec<_>>().into_iter().rev());
        }
        out
    }
}

/// A parsed controller document: XML declaration plus root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// (version, encoding) from the declaration, when present
    decl: Option<(String, Option<String>)>,
    pub root: Element,
}

impl Document {
    /// Parse a document from a string, preserving CDATA sections as
    /// distinct nodes.
    pub fn parse_str(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut decl = None;
        let mut root: Option<Element> = None;
        let mut stack: Vec<Element> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Decl(e) => {
                    let version = String::from_utf8_lossy(e.version()?.as_ref()).into_owned();
                    let encoding = match e.encoding() {
                        Some(enc) => Some(String::from_utf8_lossy(enc?.as_ref()).into_owned()),
                        None => None,
                    };
                    decl = Some((version, encoding));
                }
                Event::Start(e) => {
                    stack.push(element_from_start(&e)?);
                }
                Event::Empty(e) => {
                    let element = element_from_start(&e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(e) => {
                    let element = stack.pop().ok_or_else(|| {
                        DocumentError::Unbalanced(String::from_utf8_lossy(e.name().as_ref()).into())
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(e) => {
                    let text = e.unescape()?.into_owned();
                    if let Some(top) = stack.last_mut() {
                        top.children.push(Node::Text(text));
                    }
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    if let Some(top) = stack.last_mut() {
                        top.children.push(Node::CData(text));
                    }
                }
                Event::Comment(e) => {
                    let text = e.unescape()?.into_owned();
                    if let Some(top) = stack.last_mut() {
                        top.children.push(Node::Comment(text));
                    }
                }
                Event::Eof => break,
                // processing instructions and doctypes do not occur in
                // controller exports
                Event::PI(_) | Event::DocType(_) => {}
            }
        }

        if let Some(el) = stack.pop() {
            return Err(DocumentError::Unbalanced(el.name));
        }
        root.ok_or(DocumentError::NoRoot).map(|root| Self { decl, root })
    }

    /// Load and parse a document from disk.
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let xml = fs::read_to_string(path)?;
        log::debug!("read {} ({} bytes)", path.display(), xml.len());
        Self::parse_str(&xml)
    }

    /// Serialize back to XML, re-emitting CDATA sections verbatim.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        let (version, encoding) = match &self.decl {
            Some((v, e)) => (v.clone(), e.clone().unwrap_or_else(|| "utf-8".into())),
            None => ("1.0".into(), "utf-8".into()),
        };
        writer.write_event(Event::Decl(BytesDecl::new(&version, Some(&encoding), None)))?;
        writer.write_event(Event::Text(BytesText::new("\n")))?;
        write_element(&mut writer, &self.root)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }

    /// Serialize and write to disk.
    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let xml = self.to_xml()?;
        log::debug!("writing {} ({} bytes)", path.display(), xml.len());
        fs::write(path, xml)?;
        Ok(())
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Element(element));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(DocumentError::Unbalanced(element.name)),
    }
}

fn write_element<W: std::io::Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            Node::Element(e) => write_element(writer, e)?,
            Node::Text(t) => writer.write_event(Event::Text(BytesText::new(t)))?,
            Node::CData(t) => writer.write_event(Event::CData(BytesCData::new(t.as_str())))?,
            Node::Comment(t) => writer.write_event(Event::Comment(BytesText::new(t)))?,
        }
    }
    writer.write_event(Event::End(quick_xml::events::BytesEnd::new(
        element.name.as_str(),
    )))?;
    Ok(())
}
