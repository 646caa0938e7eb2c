use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Page a chunk was cut from. Stores leave it out for some documents, so
/// [`PageRef::Unknown`] goes over the wire as `"?"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum PageRef {
    Number(Number),
    Text(String),
    Unknown,
}

impl PageRef {
    pub const UNKNOWN_LABEL: &'static str = "?";

    /// Reads `metadata.page`. Missing, `null`, `0`, empty strings and
    /// non-scalar values all count as unknown.
    pub fn from_metadata(metadata: &Value) -> Self {
        metadata
            .get("page")
            .cloned()
            .map(PageRef::from)
            .unwrap_or(PageRef::Unknown)
    }
}

impl From<Value> for PageRef {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) if n.as_f64() != Some(0.0) => PageRef::Number(n),
            Value::String(s) if !s.is_empty() && s != Self::UNKNOWN_LABEL => PageRef::Text(s),
            _ => PageRef::Unknown,
        }
    }
}

impl From<PageRef> for Value {
    fn from(page: PageRef) -> Self {
        match page {
            PageRef::Number(n) => Value::Number(n),
            PageRef::Text(s) => Value::String(s),
            PageRef::Unknown => Value::String(PageRef::UNKNOWN_LABEL.to_string()),
        }
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageRef::Number(n) => write!(f, "{}", n),
            PageRef::Text(s) => f.write_str(s),
            PageRef::Unknown => f.write_str(Self::UNKNOWN_LABEL),
        }
    }
}

/// A retrieved chunk in the public response shape. Its position in the
/// `sources` list is what an answer's `[n]` marker points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: i64,
    pub content: String,
    pub page: PageRef,
    pub similarity: f64,
    pub chunk_index: Option<i64>,
}
