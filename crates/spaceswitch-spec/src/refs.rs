//! References to scene nodes and driver attributes.
//!
//! References are plain names; whether they still resolve is only known to
//! the scene, and is checked right before a switch runs.

use serde::{Deserialize, Serialize};

use crate::error::AttributePathError;

/// A transform (or joint) node being read or driven by a switch.
///
/// Serialized as a plain node-name string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlRef(String);

impl ControlRef {
    /// Creates a new control reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the node name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns true if the reference names nothing.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for ControlRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ControlRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ControlRef {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A scalar driver attribute and the value it must hold.
///
/// Serialized as a two-element array `["node.attribute", value]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(String, f64)", into = "(String, f64)")]
pub struct AttributeRef {
    /// Node owning the attribute.
    pub node: String,
    /// Attribute name on the node.
    pub attribute: String,
    /// Value the attribute holds in this configuration.
    pub value: f64,
}

impl AttributeRef {
    /// Creates a new attribute reference.
    pub fn new(node: impl Into<String>, attribute: impl Into<String>, value: f64) -> Self {
        Self {
            node: node.into(),
            attribute: attribute.into(),
            value,
        }
    }

    /// Parses a `node.attribute` path.
    ///
    /// The split happens on the last `.`, so namespaced and DAG-path node
    /// names are kept intact.
    pub fn parse(path: &str, value: f64) -> Result<Self, AttributePathError> {
        match path.rsplit_once('.') {
            Some((node, attribute)) if !node.is_empty() && !attribute.is_empty() => {
                Ok(Self::new(node, attribute, value))
            }
            _ => Err(AttributePathError {
                path: path.to_string(),
            }),
        }
    }

    /// Returns the `node.attribute` path.
    pub fn path(&self) -> String {
        format!("{}.{}", self.node, self.attribute)
    }

    /// Returns the same attribute holding a different value.
    pub fn with_value(&self, value: f64) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }

    /// Returns true if both references name the same attribute.
    pub fn same_attribute(&self, other: &AttributeRef) -> bool {
        self.node == other.node && self.attribute == other.attribute
    }
}

impl std::fmt::Display for AttributeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{} = {}", self.node, self.attribute, self.value)
    }
}

impl TryFrom<(String, f64)> for AttributeRef {
    type Error = AttributePathError;

    fn try_from((path, value): (String, f64)) -> Result<Self, Self::Error> {
        Self::parse(&path, value)
    }
}

impl From<AttributeRef> for (String, f64) {
    fn from(attr: AttributeRef) -> Self {
        (attr.path(), attr.value)
    }
}
