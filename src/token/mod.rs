//! Typed token tree produced by the search query parser.
//!
//! Token kinds form closed tagged unions discriminated by a `type` field in
//! their serialized form. Every node carries a `location` byte span and the
//! raw `text` it was parsed from; concatenating the `text` of the top-level
//! tokens reproduces the original query exactly. Both fields are internal
//! bookkeeping and drop out of the serialized tree once
//! [`crate::transformer::strip_source_spans`] has run.

pub mod key;
pub mod value;

pub use self::key::{
    AggregateArg, Key, KeyAggregate, KeyAggregateArgs, KeyAggregateParam, KeyExplicitTag,
    KeySimple,
};
pub use self::value::{
    Sign, Value, ValueBoolean, ValueIso8601Date, ValueNumber, ValuePercentage, ValueRelativeDate,
    ValueText,
};

use serde::Serialize;

/// Byte span of a node within the original query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Location {
    pub start: usize,
    pub end: usize,
}

impl Location {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// True for the zero span left behind by normalization.
    pub fn is_stripped(&self) -> bool {
        self.start == 0 && self.end == 0
    }
}

/// A top-level node: queries parse to an ordered sequence of these, with
/// `Spaces` interleaved between every pair of terms (including empty runs,
/// so positions always reconstruct).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Token {
    Spaces(Spaces),
    FreeText(FreeText),
    Filter(Box<Filter>),
}

impl Token {
    pub fn location(&self) -> Location {
        match self {
            Token::Spaces(node) => node.location,
            Token::FreeText(node) => node.location,
            Token::Filter(node) => node.location,
        }
    }

    /// Raw source slice this token was parsed from.
    pub fn text(&self) -> &str {
        match self {
            Token::Spaces(node) => &node.text,
            Token::FreeText(node) => &node.text,
            Token::Filter(node) => &node.text,
        }
    }

    pub fn as_filter(&self) -> Option<&Filter> {
        match self {
            Token::Filter(filter) => Some(filter),
            _ => None,
        }
    }
}

/// A run of whitespace, preserved losslessly (including empty runs).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "type", rename = "spaces")]
pub struct Spaces {
    #[serde(skip_serializing_if = "Location::is_stripped")]
    pub location: Location,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    pub value: String,
}

/// Unstructured search text outside of `key:value` filters.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "type", rename = "freeText")]
pub struct FreeText {
    #[serde(skip_serializing_if = "Location::is_stripped")]
    pub location: Location,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    pub value: String,
    pub quoted: bool,
}

/// A complete `key:value` (or `key:<op>value`) expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "filter")]
pub struct Filter {
    #[serde(skip_serializing_if = "Location::is_stripped")]
    pub location: Location,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    pub filter: FilterKind,
    pub negated: bool,
    pub key: Key,
    pub operator: Operator,
    pub value: Value,
    /// Set if and only if a semantic validation rule fired. The filter
    /// still parses with key, operator and value populated.
    pub invalid: Option<InvalidReason>,
}

/// Filter kind tag. The aggregate variants are mutually exclusive per node:
/// exactly one is selected from the parsed value variant matched against the
/// function's declared return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterKind {
    Text,
    Tag,
    Boolean,
    Numeric,
    Duration,
    Percentage,
    Date,
    RelativeDate,
    AggregateNumeric,
    AggregateDuration,
    AggregatePercentage,
    AggregateDate,
    AggregateRelativeDate,
}

/// Comparison operator in front of a filter value. Negation is tracked
/// separately on the filter node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Operator {
    #[default]
    #[serde(rename = "")]
    Default,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">=")]
    GreaterThanEqual,
    #[serde(rename = "<=")]
    LessThanEqual,
    #[serde(rename = "!")]
    Not,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Default => "",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterThanEqual => ">=",
            Operator::LessThanEqual => "<=",
            Operator::Not => "!",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Non-fatal marker for a semantically incorrect filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidReason {
    pub reason: String,
}

impl InvalidReason {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
