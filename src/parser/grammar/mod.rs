//! Recursive-descent grammar over the lexical combinators.
//!
//! The top level alternates `Spaces` and term nodes. A term is attempted as
//! a filter first and degrades to free text wholesale on any filter-syntax
//! failure, so partially well-formed filters never produce partial nodes.

pub mod key;
pub mod value;

use nom::bytes::complete::take_till1;
use nom::character::complete::char;
use nom::combinator::opt;
use nom::error::{Error as NomError, ErrorKind};
use nom::{Err as NomErr, IResult, Offset, Parser};

use crate::error::{SearchError, SearchResult};
use crate::token::{
    Filter, FilterKind, FreeText, Key, Location, Spaces, Token, Value,
};
use crate::validator::{AggregateType, SearchConfig};

use super::tokens;

pub(crate) struct Grammar<'a> {
    query: &'a str,
    config: &'a SearchConfig,
}

impl<'a> Grammar<'a> {
    pub(crate) fn new(query: &'a str, config: &'a SearchConfig) -> Self {
        Self { query, config }
    }

    /// Parse the whole query into the top-level token sequence.
    pub(crate) fn parse(&self) -> SearchResult<Vec<Token>> {
        let mut result = Vec::new();
        let (mut input, leading) = self.spaces(self.query);
        result.push(Token::Spaces(leading));

        while !input.is_empty() {
            let (rest, term) = self.term(input).map_err(|e| self.to_error(e))?;
            result.push(term);
            let (rest, trailing) = self.spaces(rest);
            result.push(Token::Spaces(trailing));
            input = rest;
        }

        Ok(result)
    }

    fn to_error(&self, err: NomErr<NomError<&'a str>>) -> SearchError {
        match err {
            NomErr::Error(e) | NomErr::Failure(e) => SearchError::parse(
                self.query.offset(e.input),
                format!("cannot tokenize remaining input: '{}'", e.input),
            ),
            NomErr::Incomplete(_) => {
                SearchError::parse(self.query.len(), "unexpected end of input")
            }
        }
    }

    /// Byte span and raw text of the region between two suffixes of the
    /// query.
    pub(super) fn span(&self, from: &'a str, to: &'a str) -> (Location, String) {
        let start = self.query.offset(from);
        let end = self.query.offset(to);
        (Location::new(start, end), self.query[start..end].to_string())
    }

    /// Whitespace run as a `Spaces` node, possibly empty. Infallible.
    pub(super) fn spaces(&self, input: &'a str) -> (&'a str, Spaces) {
        let split = input
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(input.len());
        let (ws, rest) = input.split_at(split);
        let (location, text) = self.span(input, rest);
        (
            rest,
            Spaces {
                location,
                text,
                value: ws.to_string(),
            },
        )
    }

    fn term(&self, input: &'a str) -> IResult<&'a str, Token> {
        match self.filter(input) {
            Ok((rest, filter)) => Ok((rest, Token::Filter(Box::new(filter)))),
            Err(NomErr::Failure(e)) => Err(NomErr::Failure(e)),
            Err(_) => self.free_text(input),
        }
    }

    fn free_text(&self, input: &'a str) -> IResult<&'a str, Token> {
        if input.starts_with('"') {
            // A quoted term with no closing quote cannot be tokenized;
            // fail the whole parse.
            let (rest, value) = tokens::quoted_string(input)
                .map_err(|_| NomErr::Failure(NomError::new(input, ErrorKind::TakeUntil)))?;
            let (location, text) = self.span(input, rest);
            return Ok((
                rest,
                Token::FreeText(FreeText {
                    location,
                    text,
                    value: value.to_string(),
                    quoted: true,
                }),
            ));
        }

        let (rest, value) = take_till1(char::is_whitespace).parse(input)?;
        let (location, text) = self.span(input, rest);
        Ok((
            rest,
            Token::FreeText(FreeText {
                location,
                text,
                value: value.to_string(),
                quoted: false,
            }),
        ))
    }

    fn filter(&self, input: &'a str) -> IResult<&'a str, Filter> {
        let start = input;
        let (rest, negation) = opt(char('!')).parse(input)?;
        let (rest, key) = self.key(rest)?;
        let (rest, _) = char(':').parse(rest)?;
        let (rest, operator) = opt(tokens::operator).parse(rest)?;
        let (rest, value) = self.value(rest)?;

        let kind = self.filter_kind(&key, &value);
        let invalid = match &key {
            Key::Aggregate(aggregate) => self.config.validate_aggregate(aggregate, &value),
            _ => None,
        };

        let (location, text) = self.span(start, rest);
        Ok((
            rest,
            Filter {
                location,
                text,
                filter: kind,
                negated: negation.is_some(),
                key,
                operator: operator.unwrap_or_default(),
                value,
                invalid,
            },
        ))
    }

    fn filter_kind(&self, key: &Key, value: &Value) -> FilterKind {
        match key {
            Key::ExplicitTag(_) => FilterKind::Tag,
            Key::Aggregate(aggregate) => {
                let returns = self.config.return_type(&aggregate.name.value);
                match value {
                    Value::Number(number) => {
                        if returns == Some(AggregateType::Duration) || number.has_duration_unit()
                        {
                            FilterKind::AggregateDuration
                        } else {
                            FilterKind::AggregateNumeric
                        }
                    }
                    Value::Percentage(_) => FilterKind::AggregatePercentage,
                    Value::Iso8601Date(_) => FilterKind::AggregateDate,
                    Value::RelativeDate(_) => FilterKind::AggregateRelativeDate,
                    Value::Boolean(_) => FilterKind::Boolean,
                    Value::Text(_) => FilterKind::Text,
                }
            }
            Key::Simple(_) => match value {
                Value::Number(number) if number.has_duration_unit() => FilterKind::Duration,
                Value::Number(_) => FilterKind::Numeric,
                Value::Percentage(_) => FilterKind::Percentage,
                Value::Iso8601Date(_) => FilterKind::Date,
                Value::RelativeDate(_) => FilterKind::RelativeDate,
                Value::Boolean(_) => FilterKind::Boolean,
                Value::Text(_) => FilterKind::Text,
            },
        }
    }
}
