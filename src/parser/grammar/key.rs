//! Key parsing: simple identifiers, bracketed tags and aggregate calls.

use nom::character::complete::{char, multispace0};
use nom::combinator::recognize;
use nom::{IResult, Parser};

use crate::parser::tokens;
use crate::token::{
    AggregateArg, Key, KeyAggregate, KeyAggregateArgs, KeyAggregateParam, KeyExplicitTag,
    KeySimple,
};

use super::Grammar;

impl<'a> Grammar<'a> {
    pub(super) fn key(&self, input: &'a str) -> IResult<&'a str, Key> {
        if let Ok((rest, aggregate)) = self.aggregate_key(input) {
            return Ok((rest, Key::Aggregate(Box::new(aggregate))));
        }
        if let Ok((rest, tag)) = self.explicit_tag_key(input) {
            return Ok((rest, Key::ExplicitTag(tag)));
        }
        let (rest, simple) = self.simple_key(input)?;
        Ok((rest, Key::Simple(simple)))
    }

    fn simple_key(&self, input: &'a str) -> IResult<&'a str, KeySimple> {
        if input.starts_with('"') {
            let (rest, value) = tokens::quoted_string(input)?;
            let (location, text) = self.span(input, rest);
            return Ok((
                rest,
                KeySimple {
                    location,
                    text,
                    value: value.to_string(),
                    quoted: true,
                },
            ));
        }
        let (rest, value) = tokens::key_chars(input)?;
        let (location, text) = self.span(input, rest);
        Ok((
            rest,
            KeySimple {
                location,
                text,
                value: value.to_string(),
                quoted: false,
            },
        ))
    }

    fn explicit_tag_key(&self, input: &'a str) -> IResult<&'a str, KeyExplicitTag> {
        let (rest, prefix) = tokens::function_name(input)?;
        let (rest, _) = char('[').parse(rest)?;
        let (rest, inner) = self.simple_key(rest)?;
        let (rest, _) = char(']').parse(rest)?;
        let (location, text) = self.span(input, rest);
        Ok((
            rest,
            KeyExplicitTag {
                location,
                text,
                prefix: prefix.to_string(),
                key: inner,
            },
        ))
    }

    fn aggregate_key(&self, input: &'a str) -> IResult<&'a str, KeyAggregate> {
        let (rest, name) = tokens::function_name(input)?;
        let (name_location, name_text) = self.span(input, rest);
        let (rest, _) = char('(').parse(rest)?;
        let (rest, args_space_before) = self.spaces(rest);
        let (rest, args) = match self.aggregate_args(rest) {
            Ok((rest, args)) => (rest, Some(args)),
            Err(_) => (rest, None),
        };
        let (rest, args_space_after) = self.spaces(rest);
        let (rest, _) = char(')').parse(rest)?;
        let (location, text) = self.span(input, rest);
        Ok((
            rest,
            KeyAggregate {
                location,
                text,
                name: KeySimple {
                    location: name_location,
                    text: name_text,
                    value: name.to_string(),
                    quoted: false,
                },
                args,
                args_space_before,
                args_space_after,
            },
        ))
    }

    fn aggregate_args(&self, input: &'a str) -> IResult<&'a str, KeyAggregateArgs> {
        let (mut rest, first) = self.aggregate_param(input)?;
        let mut args = vec![AggregateArg {
            separator: String::new(),
            value: first,
        }];

        // Separators keep their raw text (", " and friends) so the list
        // reconstructs exactly.
        while let Ok((after_sep, separator)) = self.arg_separator(rest) {
            match self.aggregate_param(after_sep) {
                Ok((after_param, param)) => {
                    args.push(AggregateArg {
                        separator: separator.to_string(),
                        value: param,
                    });
                    rest = after_param;
                }
                Err(_) => break,
            }
        }

        let (location, text) = self.span(input, rest);
        Ok((rest, KeyAggregateArgs { location, text, args }))
    }

    fn arg_separator(&self, input: &'a str) -> IResult<&'a str, &'a str> {
        recognize((multispace0, char(','), multispace0)).parse(input)
    }

    fn aggregate_param(&self, input: &'a str) -> IResult<&'a str, KeyAggregateParam> {
        if input.starts_with('"') {
            let (rest, value) = tokens::quoted_string(input)?;
            let (location, text) = self.span(input, rest);
            return Ok((
                rest,
                KeyAggregateParam {
                    location,
                    text,
                    value: value.to_string(),
                    quoted: true,
                },
            ));
        }
        let (rest, value) = tokens::key_chars(input)?;
        let (location, text) = self.span(input, rest);
        Ok((
            rest,
            KeyAggregateParam {
                location,
                text,
                value: value.to_string(),
                quoted: false,
            },
        ))
    }
}
