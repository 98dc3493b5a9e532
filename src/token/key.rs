//! Filter key nodes: plain identifiers, bracketed tags and aggregate calls.

use serde::Serialize;

use super::{Location, Spaces};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Key {
    Simple(KeySimple),
    ExplicitTag(KeyExplicitTag),
    Aggregate(Box<KeyAggregate>),
}

impl Key {
    pub fn location(&self) -> Location {
        match self {
            Key::Simple(node) => node.location,
            Key::ExplicitTag(node) => node.location,
            Key::Aggregate(node) => node.location,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Key::Simple(node) => &node.text,
            Key::ExplicitTag(node) => &node.text,
            Key::Aggregate(node) => &node.text,
        }
    }
}

/// A plain identifier key, e.g. `browser` or `user.email`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "type", rename = "keySimple")]
pub struct KeySimple {
    #[serde(skip_serializing_if = "Location::is_stripped")]
    pub location: Location,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    pub value: String,
    pub quoted: bool,
}

/// Bracketed tag syntax, e.g. `tags[browser]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "keyExplicitTag")]
pub struct KeyExplicitTag {
    #[serde(skip_serializing_if = "Location::is_stripped")]
    pub location: Location,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    pub prefix: String,
    pub key: KeySimple,
}

/// An aggregate function reference, e.g. `count()` or `p95(user.id)`.
/// Interior whitespace around the argument list is kept as real `Spaces`
/// nodes so the original formatting reconstructs exactly.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "type", rename = "keyAggregate", rename_all = "camelCase")]
pub struct KeyAggregate {
    #[serde(skip_serializing_if = "Location::is_stripped")]
    pub location: Location,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    pub name: KeySimple,
    pub args: Option<KeyAggregateArgs>,
    pub args_space_before: Spaces,
    pub args_space_after: Spaces,
}

impl KeyAggregate {
    /// The argument the validator checks against the declared signature.
    pub fn first_arg(&self) -> Option<&KeyAggregateParam> {
        self.args
            .as_ref()
            .and_then(|args| args.args.first())
            .map(|arg| &arg.value)
    }
}

/// Comma-separated aggregate parameter list.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "type", rename = "keyAggregateArgs")]
pub struct KeyAggregateArgs {
    #[serde(skip_serializing_if = "Location::is_stripped")]
    pub location: Location,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    pub args: Vec<AggregateArg>,
}

/// One entry of an argument list: the raw separator text in front of the
/// parameter (empty for the first entry, `", "`-style afterwards).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AggregateArg {
    pub separator: String,
    pub value: KeyAggregateParam,
}

/// One aggregate function argument.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "type", rename = "keyAggregateParam")]
pub struct KeyAggregateParam {
    #[serde(skip_serializing_if = "Location::is_stripped")]
    pub location: Location,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    pub value: String,
    pub quoted: bool,
}
