//! XML response flattening
//!
//! Turns an XML document into a JSON-like structure that renders the same
//! way a JSON response would:
//!
//! ```text
//! <root id="1"><item>1</item><item>2</item></root>
//! ```
//! becomes
//! ```text
//! { "root": { "@attributes": { "id": "1" }, "item": ["1", "2"] } }
//! ```

mod tree;
mod value;

pub use tree::XmlError;
pub use value::{XmlElement, XmlEntry, XmlValue, ATTRIBUTES_KEY, TEXT_KEY};

use serde_json::{Map, Value};

/// A flattened document: the root tag and its value
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub root: String,
    pub value: XmlValue,
}

impl XmlDocument {
    /// `{ root: value }`
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert(self.root.clone(), self.value.to_json());
        Value::Object(object)
    }
}

/// Parse and flatten an XML document
pub fn parse_xml(xml: &str) -> Result<XmlDocument, XmlError> {
    let root = tree::parse_document(xml)?;

    Ok(XmlDocument {
        value: value::flatten(&root),
        root: root.name,
    })
}
