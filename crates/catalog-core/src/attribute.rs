//! Attributes attached to applications, endpoints, types and parameters.
//!
//! Attributes are free-form metadata. A handful are meaningful to the
//! documentation generator:
//!
//! - `package`: the documentation package an application belongs to
//! - `description`: prose rendered next to the node
//! - `appfmt`: a label template used by integration diagrams
//! - `patterns`: a list of tags such as `ignore` or `db`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attribute map keyed by attribute name.
pub type Attributes = BTreeMap<String, Attribute>;

/// Name of the attribute holding pattern tags.
pub const PATTERNS: &str = "patterns";

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attribute {
    /// A string value.
    Text(String),
    /// A list of string values.
    List(Vec<String>),
}

impl Attribute {
    /// Returns the string value, or `None` for list attributes.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Attribute::Text(text) => Some(text),
            Attribute::List(_) => None,
        }
    }

    /// Returns the list values; a text attribute is a one-element list.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let values: &[String] = match self {
            Attribute::Text(text) => std::slice::from_ref(text),
            Attribute::List(list) => list,
        };
        values.iter().map(String::as_str)
    }
}

impl From<&str> for Attribute {
    fn from(text: &str) -> Self {
        Attribute::Text(text.to_string())
    }
}

/// Graph nodes carrying [`Attributes`].
pub trait Attributed {
    /// Returns the attribute map of this node.
    fn attrs(&self) -> &Attributes;

    /// Returns the text value of `key`, if present.
    fn attribute(&self, key: &str) -> Option<&str> {
        self.attrs().get(key).and_then(Attribute::as_text)
    }

    /// Returns `true` if the `patterns` attribute contains `pattern`.
    fn has_pattern(&self, pattern: &str) -> bool {
        self.attrs()
            .get(PATTERNS)
            .is_some_and(|attr| attr.values().any(|value| value == pattern))
    }
}
