//! Generic pre-order visitor over the token tree.
//!
//! Every reachable node is visited exactly once; nested node fields are
//! walked in source order. The tree is acyclic by construction (each node
//! exclusively owns its children), so plain recursion suffices. Consumers
//! rewrite nodes in place through [`NodeMut`]; the tagged unions are closed,
//! so a visit can change a node's fields but never its kind.

use crate::token::{
    Filter, FreeText, Key, KeyAggregate, KeyAggregateArgs, KeyAggregateParam, KeyExplicitTag,
    KeySimple, Location, Spaces, Token, Value, ValueBoolean, ValueIso8601Date, ValueNumber,
    ValuePercentage, ValueRelativeDate, ValueText,
};

/// Mutable reference to any node in the token tree.
pub enum NodeMut<'a> {
    Spaces(&'a mut Spaces),
    FreeText(&'a mut FreeText),
    Filter(&'a mut Filter),
    KeySimple(&'a mut KeySimple),
    KeyExplicitTag(&'a mut KeyExplicitTag),
    KeyAggregate(&'a mut KeyAggregate),
    KeyAggregateArgs(&'a mut KeyAggregateArgs),
    KeyAggregateParam(&'a mut KeyAggregateParam),
    ValueText(&'a mut ValueText),
    ValueBoolean(&'a mut ValueBoolean),
    ValueNumber(&'a mut ValueNumber),
    ValuePercentage(&'a mut ValuePercentage),
    ValueIso8601Date(&'a mut ValueIso8601Date),
    ValueRelativeDate(&'a mut ValueRelativeDate),
}

impl NodeMut<'_> {
    pub fn location_mut(&mut self) -> &mut Location {
        match self {
            NodeMut::Spaces(node) => &mut node.location,
            NodeMut::FreeText(node) => &mut node.location,
            NodeMut::Filter(node) => &mut node.location,
            NodeMut::KeySimple(node) => &mut node.location,
            NodeMut::KeyExplicitTag(node) => &mut node.location,
            NodeMut::KeyAggregate(node) => &mut node.location,
            NodeMut::KeyAggregateArgs(node) => &mut node.location,
            NodeMut::KeyAggregateParam(node) => &mut node.location,
            NodeMut::ValueText(node) => &mut node.location,
            NodeMut::ValueBoolean(node) => &mut node.location,
            NodeMut::ValueNumber(node) => &mut node.location,
            NodeMut::ValuePercentage(node) => &mut node.location,
            NodeMut::ValueIso8601Date(node) => &mut node.location,
            NodeMut::ValueRelativeDate(node) => &mut node.location,
        }
    }

    pub fn text_mut(&mut self) -> &mut String {
        match self {
            NodeMut::Spaces(node) => &mut node.text,
            NodeMut::FreeText(node) => &mut node.text,
            NodeMut::Filter(node) => &mut node.text,
            NodeMut::KeySimple(node) => &mut node.text,
            NodeMut::KeyExplicitTag(node) => &mut node.text,
            NodeMut::KeyAggregate(node) => &mut node.text,
            NodeMut::KeyAggregateArgs(node) => &mut node.text,
            NodeMut::KeyAggregateParam(node) => &mut node.text,
            NodeMut::ValueText(node) => &mut node.text,
            NodeMut::ValueBoolean(node) => &mut node.text,
            NodeMut::ValueNumber(node) => &mut node.text,
            NodeMut::ValuePercentage(node) => &mut node.text,
            NodeMut::ValueIso8601Date(node) => &mut node.text,
            NodeMut::ValueRelativeDate(node) => &mut node.text,
        }
    }

    /// The serialized `type` discriminant of the visited node.
    pub fn kind(&self) -> &'static str {
        match self {
            NodeMut::Spaces(_) => "spaces",
            NodeMut::FreeText(_) => "freeText",
            NodeMut::Filter(_) => "filter",
            NodeMut::KeySimple(_) => "keySimple",
            NodeMut::KeyExplicitTag(_) => "keyExplicitTag",
            NodeMut::KeyAggregate(_) => "keyAggregate",
            NodeMut::KeyAggregateArgs(_) => "keyAggregateArgs",
            NodeMut::KeyAggregateParam(_) => "keyAggregateParam",
            NodeMut::ValueText(_) => "valueText",
            NodeMut::ValueBoolean(_) => "valueBoolean",
            NodeMut::ValueNumber(_) => "valueNumber",
            NodeMut::ValuePercentage(_) => "valuePercentage",
            NodeMut::ValueIso8601Date(_) => "valueIso8601Date",
            NodeMut::ValueRelativeDate(_) => "valueRelativeDate",
        }
    }
}

/// Apply `visit` to every node of the tree, parents before children.
pub fn transform_tree(tokens: &mut [Token], visit: &mut impl FnMut(NodeMut<'_>)) {
    for token in tokens {
        transform_token(token, visit);
    }
}

/// Clears source bookkeeping (`location`, `text`) from every node, leaving
/// only the externally observable fields. Run before serializing a tree for
/// comparison or display.
pub fn strip_source_spans(tokens: &mut [Token]) {
    transform_tree(tokens, &mut |mut node| {
        *node.location_mut() = Location::default();
        node.text_mut().clear();
    });
}

fn transform_token(token: &mut Token, visit: &mut impl FnMut(NodeMut<'_>)) {
    match token {
        Token::Spaces(node) => visit(NodeMut::Spaces(node)),
        Token::FreeText(node) => visit(NodeMut::FreeText(node)),
        Token::Filter(node) => {
            visit(NodeMut::Filter(node));
            transform_key(&mut node.key, visit);
            transform_value(&mut node.value, visit);
        }
    }
}

fn transform_key(key: &mut Key, visit: &mut impl FnMut(NodeMut<'_>)) {
    match key {
        Key::Simple(node) => visit(NodeMut::KeySimple(node)),
        Key::ExplicitTag(node) => {
            visit(NodeMut::KeyExplicitTag(node));
            visit(NodeMut::KeySimple(&mut node.key));
        }
        Key::Aggregate(node) => {
            visit(NodeMut::KeyAggregate(node));
            visit(NodeMut::KeySimple(&mut node.name));
            visit(NodeMut::Spaces(&mut node.args_space_before));
            if let Some(args) = &mut node.args {
                visit(NodeMut::KeyAggregateArgs(args));
                for arg in &mut args.args {
                    visit(NodeMut::KeyAggregateParam(&mut arg.value));
                }
            }
            visit(NodeMut::Spaces(&mut node.args_space_after));
        }
    }
}

fn transform_value(value: &mut Value, visit: &mut impl FnMut(NodeMut<'_>)) {
    match value {
        Value::Text(node) => visit(NodeMut::ValueText(node)),
        Value::Boolean(node) => visit(NodeMut::ValueBoolean(node)),
        Value::Number(node) => visit(NodeMut::ValueNumber(node)),
        Value::Percentage(node) => visit(NodeMut::ValuePercentage(node)),
        Value::Iso8601Date(node) => visit(NodeMut::ValueIso8601Date(node)),
        Value::RelativeDate(node) => visit(NodeMut::ValueRelativeDate(node)),
    }
}
