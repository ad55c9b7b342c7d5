use chrono::NaiveDateTime;
use indexmap::IndexMap;
use bigdecimal::BigDecimal;
use serde::Serialize;
use std::fmt;

/// A coerced cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypedValue {
    Text(String),
    /// Exact decimal parsed from the displayed text, never from the stored double.
    Decimal(BigDecimal),
    Date(NaiveDateTime),
    Boolean(bool),
    /// A blank cell. Readers always get a value, never a missing key.
    EmptyText,
}

impl TypedValue {
    /// Borrow the value as text if it is textual
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TypedValue::Text(s) => Some(s),
            TypedValue::EmptyText => Some(""),
            _ => None,
        }
    }

    /// Get the decimal if the value is one
    #[must_use]
    pub fn as_decimal(&self) -> Option<&BigDecimal> {
        match self {
            TypedValue::Decimal(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Text(s) => f.write_str(s),
            TypedValue::Decimal(d) => write!(f, "{d}"),
            TypedValue::Date(dt) => write!(f, "{dt}"),
            TypedValue::Boolean(b) => write!(f, "{b}"),
            TypedValue::EmptyText => Ok(()),
        }
    }
}

/// One emitted row: column key to value, in column order, plus the offset it was read at
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    offset: String,
    fields: IndexMap<String, TypedValue>,
}

impl Record {
    #[must_use]
    pub fn new(offset: String, fields: IndexMap<String, TypedValue>) -> Self {
        Record { offset, fields }
    }

    /// Offset identifying the row this record came from
    #[must_use]
    pub fn offset(&self) -> &str {
        &self.offset
    }

    /// Fields in column order
    #[must_use]
    pub fn fields(&self) -> &IndexMap<String, TypedValue> {
        &self.fields
    }

    /// Get a field by column key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TypedValue> {
        self.fields.get(key)
    }

    /// Column keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    #[must_use]
    pub fn into_fields(self) -> IndexMap<String, TypedValue> {
        self.fields
    }
}
