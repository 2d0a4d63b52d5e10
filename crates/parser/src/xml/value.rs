//! Structured values produced by flattening an XML element tree

use super::tree::{Element, Node};
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Key under which attributes are hoisted
pub const ATTRIBUTES_KEY: &str = "@attributes";

/// Key under which element text is collected
pub const TEXT_KEY: &str = "#text";

/// A flattened element: either a bare text leaf or an object
#[derive(Debug, Clone, PartialEq)]
pub enum XmlValue {
    Text(String),
    Element(XmlElement),
}

/// The value(s) stored under one child tag name
///
/// A tag seen once is `Single`; a tag repeated among siblings becomes
/// `Repeated`, holding every occurrence in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlEntry {
    Single(XmlValue),
    Repeated(Vec<XmlValue>),
}

impl XmlEntry {
    fn push(&mut self, value: XmlValue) {
        match self {
            XmlEntry::Repeated(values) => values.push(value),
            XmlEntry::Single(first) => {
                let first = std::mem::replace(first, XmlValue::Text(String::new()));
                *self = XmlEntry::Repeated(vec![first, value]);
            }
        }
    }

    /// Every value under this tag, in document order
    pub fn values(&self) -> &[XmlValue] {
        match self {
            XmlEntry::Single(value) => std::slice::from_ref(value),
            XmlEntry::Repeated(values) => values,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            XmlEntry::Single(value) => value.to_json(),
            XmlEntry::Repeated(values) => Value::Array(values.iter().map(XmlValue::to_json).collect()),
        }
    }
}

/// Element with attributes, text or child elements
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    attributes: IndexMap<String, String>,
    text: Option<String>,
    children: IndexMap<String, XmlEntry>,
}

impl XmlElement {
    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Concatenated text runs, trimmed, without separators
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn child(&self, tag: &str) -> Option<&XmlEntry> {
        self.children.get(tag)
    }

    /// Child tags in order of first appearance
    pub fn children(&self) -> impl Iterator<Item = (&str, &XmlEntry)> {
        self.children.iter().map(|(tag, entry)| (tag.as_str(), entry))
    }

    fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.text.is_none() && self.children.is_empty()
    }

    fn insert_child(&mut self, tag: String, value: XmlValue) {
        match self.children.entry(tag) {
            Entry::Vacant(slot) => {
                slot.insert(XmlEntry::Single(value));
            }
            Entry::Occupied(mut slot) => slot.get_mut().push(value),
        }
    }

    /// JSON object using the `@attributes` / `#text` key convention
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();

        if !self.attributes.is_empty() {
            let attributes = self
                .attributes
                .iter()
                .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                .collect();
            object.insert(ATTRIBUTES_KEY.to_string(), Value::Object(attributes));
        }
        if let Some(text) = &self.text {
            object.insert(TEXT_KEY.to_string(), Value::String(text.clone()));
        }
        for (tag, entry) in &self.children {
            object.insert(tag.clone(), entry.to_json());
        }

        Value::Object(object)
    }
}

impl XmlValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmlValue::Text(text) => Some(text),
            XmlValue::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlValue::Element(element) => Some(element),
            XmlValue::Text(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            XmlValue::Text(text) => Value::String(text.clone()),
            XmlValue::Element(element) => element.to_json(),
        }
    }
}

/// Flatten one element and everything below it
///
/// - attributes are hoisted under `@attributes`
/// - a lone text child of an attribute-less element collapses to a text leaf
/// - other text runs are trimmed and concatenated under `#text`
/// - repeated child tags are promoted to `Repeated`
/// - an element with nothing left is the empty text leaf
pub(crate) fn flatten(element: &Element) -> XmlValue {
    let mut result = XmlElement::default();
    for (name, value) in &element.attributes {
        result.attributes.insert(name.clone(), value.clone());
    }

    let collapses_to_text = element.children.len() == 1 && element.attributes.is_empty();

    for node in &element.children {
        match node {
            Node::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if collapses_to_text {
                    return XmlValue::Text(trimmed.to_string());
                }
                result
                    .text
                    .get_or_insert_with(String::new)
                    .push_str(trimmed);
            }
            Node::Element(child) => result.insert_child(child.name.clone(), flatten(child)),
            Node::Other => {}
        }
    }

    if result.is_empty() {
        XmlValue::Text(String::new())
    } else {
        XmlValue::Element(result)
    }
}
