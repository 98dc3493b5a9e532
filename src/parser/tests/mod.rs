use crate::parser::{parse_search, parse_search_with};
use crate::token::*;

mod aggregates;

/// Parse and panic on syntactic failure.
fn parse_ok(query: &str) -> Vec<Token> {
    parse_search(query).expect("query should parse")
}

/// The single filter node of a `<spaces> <filter> <spaces>` parse.
fn only_filter(query: &str) -> Filter {
    let tokens = parse_ok(query);
    assert_eq!(
        tokens.len(),
        3,
        "expected spaces/filter/spaces for {query:?}, got {tokens:?}"
    );
    match &tokens[1] {
        Token::Filter(filter) => (**filter).clone(),
        other => panic!("expected filter, got {other:?}"),
    }
}

/// The single free text node of a `<spaces> <text> <spaces>` parse.
fn only_free_text(query: &str) -> FreeText {
    let tokens = parse_ok(query);
    assert_eq!(tokens.len(), 3, "expected spaces/text/spaces for {query:?}");
    match &tokens[1] {
        Token::FreeText(text) => text.clone(),
        other => panic!("expected free text, got {other:?}"),
    }
}
