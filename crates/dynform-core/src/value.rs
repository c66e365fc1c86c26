//! Scalar values held by form controls.

use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::dates::parse_date;
use crate::enums::FieldType;

/// The current value of one form control.
///
/// `Empty` is the unset state every control starts in unless the catalog
/// gives a default. `Text` is never empty; use [`FieldValue::text`] to build
/// one from arbitrary input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    Number(i64),
    Date(NaiveDate),
}

impl FieldValue {
    /// Text value, collapsing the empty string to [`FieldValue::Empty`].
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s)
        }
    }

    /// Coerce raw input to the shape a field of type `field_type` holds.
    ///
    /// Surrounding whitespace is dropped. Date fields parse dates, number
    /// fields parse integers. Input that does not parse is kept as text so
    /// nothing the user typed is lost; handlers treat such values as absent.
    pub fn coerce(raw: &str, field_type: &FieldType) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        match field_type {
            FieldType::Date => parse_date(trimmed)
                .map(Self::Date)
                .unwrap_or_else(|| Self::text(trimmed)),
            FieldType::Number => trimmed
                .parse::<i64>()
                .map(Self::Number)
                .unwrap_or_else(|_| Self::text(trimmed)),
            _ => Self::text(trimmed),
        }
    }

    /// `true` for the unset state. Zero and other falsy-looking values are present.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// The value as a calendar date, parsing text if needed.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            Self::Text(s) => parse_date(s),
            _ => None,
        }
    }

    /// The value as an integer, parsing text if needed.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The value as a string slice, for text values only.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render with a caller-chosen chrono format for dates.
    pub fn display_with(&self, date_format: &str) -> String {
        match self {
            Self::Date(d) => d.format(date_format).to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_str(""),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Number(n) => serializer.serialize_i64(*n),
            Self::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
        }
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::text(s)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::text(s)
    }
}
