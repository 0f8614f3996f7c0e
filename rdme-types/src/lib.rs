//! Shared types for rdme
//!
//! This crate provides the data model passed between the upstream renderer,
//! the transformation pipeline and the artifact writer: document identifiers,
//! frontmatter values and per-document metadata.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Document identifier
///
/// A path-like name such as `api/index`, unique within one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(pub String);

impl DocId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory component of the identifier (`""` for top-level documents)
    pub fn parent(&self) -> &str {
        match self.0.rfind(['/', '\\']) {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }

    /// Last path component of the identifier
    pub fn basename(&self) -> &str {
        match self.0.rfind(['/', '\\']) {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for DocId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocId {
    fn from(id: &str) -> Self {
        DocId(id.to_string())
    }
}

impl From<String> for DocId {
    fn from(id: String) -> Self {
        DocId(id)
    }
}

/// Ordered frontmatter mapping; insertion order is emission order.
pub type FrontmatterFields = IndexMap<String, FieldValue>;

/// A frontmatter value
///
/// `Null` is the "skip" sentinel: it can be merged over another value to
/// suppress it, and is never written out as a top-level field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<FieldValue>),
    Mapping(FrontmatterFields),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&FrontmatterFields> {
        match self {
            FieldValue::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Look up a key when this value is a mapping
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Render a scalar as plain text (no quoting); `None` for null and collections.
    pub fn to_plain_text(&self) -> Option<String> {
        match self {
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Null | FieldValue::Sequence(_) | FieldValue::Mapping(_) => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(items: Vec<FieldValue>) -> Self {
        FieldValue::Sequence(items)
    }
}

impl From<FrontmatterFields> for FieldValue {
    fn from(map: FrontmatterFields) -> Self {
        FieldValue::Mapping(map)
    }
}

/// A raw metadata value as supplied by the upstream renderer
///
/// Field-list style metadata arrives as text and is coerced later; frontmatter
/// style metadata may already be typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Text(String),
    Typed(FieldValue),
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Text(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::Text(s)
    }
}

impl From<FieldValue> for MetaValue {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::String(s) => MetaValue::Text(s),
            other => MetaValue::Typed(other),
        }
    }
}

/// Per-document metadata, in source order
pub type MetadataBag = IndexMap<String, MetaValue>;

/// One rendered document handed to the pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    /// Markdown produced by the upstream renderer
    pub body: String,
    #[serde(default)]
    pub metadata: MetadataBag,
    /// Title found in the document tree, if the renderer reported one
    #[serde(default)]
    pub title: Option<String>,
}

impl Document {
    pub fn new(id: impl Into<DocId>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
            metadata: MetadataBag::new(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
