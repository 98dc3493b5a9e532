//! Lexical combinators shared by the grammar.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{opt, recognize, value},
    sequence::{delimited, terminated},
};

use crate::token::Operator;

/// Bare key characters: identifiers plus `.`, `_` and `-`
/// (e.g. `user.email`, `device.family`, `stack.in-app`).
pub fn key_chars(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '.' | '-')).parse(input)
}

/// Aggregate function names and tag prefixes: bare identifiers without dots
/// (e.g. `count_unique`, `p95`, `tags`).
pub fn function_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_').parse(input)
}

/// The inner content of a double-quoted string. Quotes cannot be escaped;
/// the value simply runs to the next `"`.
pub fn quoted_string(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_while(|c| c != '"'), char('"')).parse(input)
}

/// Comparison operator in front of a filter value.
pub fn operator(input: &str) -> IResult<&str, Operator> {
    alt((
        value(Operator::GreaterThanEqual, tag(">=")),
        value(Operator::LessThanEqual, tag("<=")),
        value(Operator::GreaterThan, char('>')),
        value(Operator::LessThan, char('<')),
        value(Operator::Not, char('!')),
    ))
    .parse(input)
}

/// Decimal literal with optional sign and fraction.
pub fn numeric(input: &str) -> IResult<&str, &str> {
    recognize((opt(char('-')), digit1, opt((char('.'), digit1)))).parse(input)
}

/// Magnitude or duration suffix for numbers. Longer tags first so `ms` and
/// `min` win over `m`.
pub fn number_unit(input: &str) -> IResult<&str, &str> {
    alt((
        tag("ms"),
        tag("min"),
        tag("m"),
        tag("s"),
        tag("h"),
        tag("d"),
        tag("w"),
        tag("k"),
        tag("b"),
    ))
    .parse(input)
}

/// Percentage literal: `23%`, `99.9%`. Returns the numeric part.
pub fn percentage(input: &str) -> IResult<&str, &str> {
    terminated(numeric, char('%')).parse(input)
}

/// Relative date literal: `+1d`, `-3w`. Returns (sign, digits, unit).
pub fn relative_date(input: &str) -> IResult<&str, (char, &str, char)> {
    (one_of("+-"), digit1, one_of("smhdw")).parse(input)
}

/// Boolean literal, case-insensitive.
pub fn boolean(input: &str) -> IResult<&str, bool> {
    alt((
        value(true, tag_no_case("true")),
        value(false, tag_no_case("false")),
    ))
    .parse(input)
}
