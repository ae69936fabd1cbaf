use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod metadata;
pub mod requests;

pub use metadata::*;
pub use requests::*;

/// A single raw worksheet cell, as handed over by the tabular reader.
///
/// Serialized untagged, so JSON `null`, strings, numbers and booleans map
/// directly onto cells. Strings are never reinterpreted as dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Date(NaiveDateTime),
}

impl CellValue {
    /// Empty cells and whitespace-only text count as "no value".
    pub fn is_absent(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Header text of the cell, if it holds text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Text(text) => write!(f, "{text}"),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

/// One data row, aligned to the physical columns of its worksheet.
pub type Row = Vec<CellValue>;

/// Language the service uses for display labels (e.g. 1033 for English).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale(pub u32);

impl Locale {
    pub fn label<S: Into<String>>(&self, text: S) -> Label {
        Label {
            text: text.into(),
            language_code: self.0,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Localised display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub language_code: u32,
}

/// A (label, value) pair of an option set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub label: Label,
    pub value: i32,
}
