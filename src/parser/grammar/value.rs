//! Value parsing: the raw span is sliced first (quoted string or run up to
//! whitespace), then value kinds are tried in priority order. The first
//! parser that consumes the whole span wins; ultimate failure degrades to
//! free text.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use nom::bytes::complete::take_till1;
use nom::combinator::opt;
use nom::{IResult, Parser};

use crate::parser::tokens;
use crate::token::{
    Location, Sign, Value, ValueBoolean, ValueIso8601Date, ValueNumber, ValuePercentage,
    ValueRelativeDate, ValueText,
};

use super::Grammar;

impl<'a> Grammar<'a> {
    pub(super) fn value(&self, input: &'a str) -> IResult<&'a str, Value> {
        if input.starts_with('"') {
            let (rest, inner) = tokens::quoted_string(input)?;
            let (location, text) = self.span(input, rest);
            return Ok((
                rest,
                Value::Text(ValueText {
                    location,
                    text,
                    value: inner.to_string(),
                    quoted: true,
                }),
            ));
        }

        let (rest, raw) = take_till1(char::is_whitespace).parse(input)?;
        let (location, text) = self.span(input, rest);
        Ok((rest, value_from_span(raw, location, text)))
    }
}

/// Priority order: ISO-8601 date, relative date, percentage, number,
/// boolean, free text.
fn value_from_span(raw: &str, location: Location, text: String) -> Value {
    if let Some(value) = parse_iso8601(raw) {
        return Value::Iso8601Date(ValueIso8601Date {
            location,
            text,
            value,
        });
    }
    if let Some((sign, value, unit)) = parse_relative_date(raw) {
        return Value::RelativeDate(ValueRelativeDate {
            location,
            text,
            sign,
            value,
            unit,
        });
    }
    if let Some(value) = parse_percentage(raw) {
        return Value::Percentage(ValuePercentage {
            location,
            text,
            value,
        });
    }
    if let Some((value, raw_value, unit)) = parse_number(raw) {
        return Value::Number(ValueNumber {
            location,
            text,
            value,
            raw_value,
            unit,
        });
    }
    if let Some(value) = parse_boolean(raw) {
        return Value::Boolean(ValueBoolean {
            location,
            text,
            value,
        });
    }
    Value::Text(ValueText {
        location,
        text,
        value: raw.to_string(),
        quoted: false,
    })
}

/// ISO-8601 timestamps normalize to UTC; date-only forms get midnight.
/// Calendar-invalid dates fall through to the next value kind.
fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&datetime));
        }
    }
    None
}

fn parse_relative_date(raw: &str) -> Option<(Sign, i64, String)> {
    let (rest, (sign, digits, unit)) = tokens::relative_date(raw).ok()?;
    if !rest.is_empty() {
        return None;
    }
    let sign = if sign == '+' { Sign::Plus } else { Sign::Minus };
    Some((sign, digits.parse().ok()?, unit.to_string()))
}

fn parse_percentage(raw: &str) -> Option<f64> {
    let (rest, digits) = tokens::percentage(raw).ok()?;
    if !rest.is_empty() {
        return None;
    }
    digits.parse().ok()
}

fn parse_number(raw: &str) -> Option<(String, f64, Option<String>)> {
    let (rest, digits) = tokens::numeric(raw).ok()?;
    let (rest, unit) = opt(tokens::number_unit).parse(rest).ok()?;
    if !rest.is_empty() {
        return None;
    }
    Some((
        digits.to_string(),
        digits.parse().ok()?,
        unit.map(str::to_string),
    ))
}

fn parse_boolean(raw: &str) -> Option<bool> {
    let (rest, value) = tokens::boolean(raw).ok()?;
    if !rest.is_empty() {
        return None;
    }
    Some(value)
}
