//! Minimal XML node tree built with quick-xml
//!
//! Holds just enough of the document to flatten it: element names,
//! attributes, text and the position of every child node. Comments and
//! processing instructions are kept as placeholders so they still count as
//! child nodes.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Deepest element nesting accepted; flattening recurses once per level
pub(crate) const MAX_DEPTH: usize = 256;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("xml: {0}")]
    Syntax(String),
    #[error("invalid document: {0}")]
    Invalid(String),
}

impl From<quick_xml::Error> for XmlError {
    fn from(err: quick_xml::Error) -> Self {
        XmlError::Syntax(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Element(Element),
    /// Adjacent text and CDATA runs, unescaped
    Text(String),
    /// Comment or processing instruction
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    fn start(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| XmlError::Syntax(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    fn push_text(&mut self, text: &str) {
        if let Some(Node::Text(previous)) = self.children.last_mut() {
            previous.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_string()));
        }
    }
}

/// Parse a complete document and return its root element
///
/// The document must contain exactly one root element with every tag
/// closed; only whitespace, comments, processing instructions and the
/// declaration may sit outside it. Nesting is capped at [`MAX_DEPTH`].
pub(crate) fn parse_document(xml: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                ensure_no_root(&root, &stack)?;
                ensure_depth(&stack)?;
                stack.push(Element::start(&e)?);
            }
            Event::Empty(e) => {
                ensure_no_root(&root, &stack)?;
                ensure_depth(&stack)?;
                close_element(Element::start(&e)?, &mut stack, &mut root);
            }
            Event::End(e) => {
                let element = stack.pop().ok_or_else(|| {
                    XmlError::Invalid(format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    ))
                })?;
                if e.name().as_ref() != element.name.as_bytes() {
                    return Err(XmlError::Invalid(format!(
                        "expected </{}>, found </{}>",
                        element.name,
                        String::from_utf8_lossy(e.name().as_ref())
                    )));
                }
                close_element(element, &mut stack, &mut root);
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                add_text(&text, &mut stack)?;
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                add_text(&text, &mut stack)?;
            }
            Event::Comment(_) | Event::PI(_) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Other);
                }
            }
            Event::Decl(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(unclosed) = stack.last() {
        return Err(XmlError::Invalid(format!(
            "unclosed tag <{}>",
            unclosed.name
        )));
    }

    root.ok_or_else(|| XmlError::Invalid("no root element".to_string()))
}

fn ensure_no_root(root: &Option<Element>, stack: &[Element]) -> Result<(), XmlError> {
    if stack.is_empty() && root.is_some() {
        return Err(XmlError::Invalid(
            "more than one root element".to_string(),
        ));
    }
    Ok(())
}

fn ensure_depth(stack: &[Element]) -> Result<(), XmlError> {
    if stack.len() >= MAX_DEPTH {
        return Err(XmlError::Invalid(format!(
            "elements nested deeper than {} levels",
            MAX_DEPTH
        )));
    }
    Ok(())
}

fn close_element(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None => *root = Some(element),
    }
}

fn add_text(text: &str, stack: &mut [Element]) -> Result<(), XmlError> {
    if text.is_empty() {
        return Ok(());
    }

    match stack.last_mut() {
        Some(parent) => {
            parent.push_text(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(XmlError::Invalid(
            "text outside the root element".to_string(),
        )),
    }
}
