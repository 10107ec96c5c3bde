//! Field values carried through resolution, validation, and rendering.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A single field value.
///
/// Input documents are flat mappings, so a value is either a scalar or a
/// sequence of strings. YAML `null` is not a value: it means "not mentioned"
/// and is dropped when a layer is read (see [`deserialize_layer`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

/// A flat mapping of field name to value. Ordered so that every traversal is
/// deterministic.
pub type FieldValues = BTreeMap<String, Value>;

impl Value {
    /// Short name of the value's kind, used in type-mismatch messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::List(_) => "list",
        }
    }

    /// Template truthiness: empty text, empty list, `false`, and zero are
    /// falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0,
            Self::Text(s) => !s.is_empty(),
            Self::List(items) => !items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// True for a text value that is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

/// Render a number the way a person would write it: `3` rather than `3.0`.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_string).collect())
    }
}

/// Wire shape of a value. List elements may be any scalar; they are stored
/// as text. Nulls inside a list are dropped.
#[derive(Deserialize)]
#[serde(untagged, expecting = "a scalar or a list of scalars")]
enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Option<Scalar>>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => format_number(n),
            Scalar::Text(s) => s,
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawValue::deserialize(deserializer)? {
            RawValue::Bool(b) => Self::Bool(b),
            RawValue::Number(n) => Self::Number(n),
            RawValue::Text(s) => Self::Text(s),
            RawValue::List(items) => Self::List(items.into_iter().flatten().map(String::from).collect()),
        })
    }
}

/// Deserialize a layer of field values, dropping entries mapped to null.
///
/// Use with `#[serde(deserialize_with = "deserialize_layer")]`.
pub fn deserialize_layer<'de, D>(deserializer: D) -> Result<FieldValues, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Option<Value>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect())
}
