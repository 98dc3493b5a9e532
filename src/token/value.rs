//! Filter value nodes.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use super::Location;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(ValueText),
    Boolean(ValueBoolean),
    Number(ValueNumber),
    Percentage(ValuePercentage),
    Iso8601Date(ValueIso8601Date),
    RelativeDate(ValueRelativeDate),
}

impl Value {
    pub fn location(&self) -> Location {
        match self {
            Value::Text(node) => node.location,
            Value::Boolean(node) => node.location,
            Value::Number(node) => node.location,
            Value::Percentage(node) => node.location,
            Value::Iso8601Date(node) => node.location,
            Value::RelativeDate(node) => node.location,
        }
    }

    /// Raw source slice, e.g. `23%` or `2022-03-21`. Validation messages
    /// quote this.
    pub fn text(&self) -> &str {
        match self {
            Value::Text(node) => &node.text,
            Value::Boolean(node) => &node.text,
            Value::Number(node) => &node.text,
            Value::Percentage(node) => &node.text,
            Value::Iso8601Date(node) => &node.text,
            Value::RelativeDate(node) => &node.text,
        }
    }
}

/// Unquoted or quoted text value, wildcards included verbatim.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "type", rename = "valueText")]
pub struct ValueText {
    #[serde(skip_serializing_if = "Location::is_stripped")]
    pub location: Location,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    pub value: String,
    pub quoted: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "type", rename = "valueBoolean")]
pub struct ValueBoolean {
    #[serde(skip_serializing_if = "Location::is_stripped")]
    pub location: Location,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    pub value: bool,
}

/// Numeric literal with an optional magnitude (`k`, `m`, `b`) or duration
/// (`ms`, `s`, `min`, `h`, `d`, `w`) suffix. `value` keeps the raw digits,
/// `rawValue` the parsed number.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "type", rename = "valueNumber", rename_all = "camelCase")]
pub struct ValueNumber {
    #[serde(skip_serializing_if = "Location::is_stripped")]
    pub location: Location,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    pub value: String,
    pub raw_value: f64,
    pub unit: Option<String>,
}

impl ValueNumber {
    /// Duration suffixes. A bare `m` is ambiguous with millions and counts
    /// as a magnitude.
    pub fn has_duration_unit(&self) -> bool {
        matches!(
            self.unit.as_deref(),
            Some("ms" | "s" | "min" | "h" | "d" | "w")
        )
    }
}

/// Numeric value followed by `%`. `value` is the magnitude, not divided
/// by 100.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "type", rename = "valuePercentage")]
pub struct ValuePercentage {
    #[serde(skip_serializing_if = "Location::is_stripped")]
    pub location: Location,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    pub value: f64,
}

/// Absolute date/time literal, normalized to UTC. Serializes as a fixed
/// millisecond ISO-8601 string (`2022-03-21T00:00:00.000Z`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "valueIso8601Date")]
pub struct ValueIso8601Date {
    #[serde(skip_serializing_if = "Location::is_stripped")]
    pub location: Location,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(serialize_with = "serialize_iso8601")]
    pub value: DateTime<Utc>,
}

/// Relative date literal like `+1d` or `-3w`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "valueRelativeDate")]
pub struct ValueRelativeDate {
    #[serde(skip_serializing_if = "Location::is_stripped")]
    pub location: Location,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    pub sign: Sign,
    pub value: i64,
    pub unit: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sign {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Sign {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sign::Plus => "+",
            Sign::Minus => "-",
        }
    }
}

impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn serialize_iso8601<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&value.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
}
