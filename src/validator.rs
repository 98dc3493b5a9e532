//! Aggregate signature registry and semantic validation.
//!
//! Filters whose key is an aggregate are checked against the registry
//! during construction. Failures never abort the parse; they annotate the
//! filter node with a human-readable reason.

use std::collections::HashMap;

use strsim::levenshtein;

use crate::token::{InvalidReason, KeyAggregate, Value};

/// Declared return type of an aggregate function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateType {
    Number,
    Duration,
    Percentage,
    Date,
    String,
}

impl AggregateType {
    pub fn describe(&self) -> &'static str {
        match self {
            AggregateType::Number => "number",
            AggregateType::Duration => "duration",
            AggregateType::Percentage => "percentage",
            AggregateType::Date => "date",
            AggregateType::String => "string",
        }
    }
}

/// Declared argument shape of an aggregate function.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentSpec {
    /// The function takes no arguments.
    None,
    /// Exactly one argument drawn from a fixed set of fields.
    OneOf(Vec<String>),
    /// A single open argument (any field or literal).
    Any,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSignature {
    pub arguments: ArgumentSpec,
    pub returns: AggregateType,
}

impl AggregateSignature {
    pub fn new(arguments: ArgumentSpec, returns: AggregateType) -> Self {
        Self { arguments, returns }
    }
}

/// Fields the percentile-style aggregates accept.
const DURATION_FIELDS: &[&str] = &[
    "transaction.duration",
    "measurements.fcp",
    "measurements.fp",
    "measurements.lcp",
    "measurements.ttfb",
    "measurements.fid",
    "spans.browser",
    "spans.db",
    "spans.http",
    "spans.resource",
];

/// Schema consulted read-only while validating aggregate filters: a mapping
/// from function name to its declared signature.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    aggregates: HashMap<String, AggregateSignature>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let duration_fields = || {
            ArgumentSpec::OneOf(DURATION_FIELDS.iter().map(|s| s.to_string()).collect())
        };
        let mut config = Self::empty();
        for (name, signature) in [
            (
                "count",
                AggregateSignature::new(ArgumentSpec::None, AggregateType::Number),
            ),
            (
                "count_unique",
                AggregateSignature::new(ArgumentSpec::Any, AggregateType::Number),
            ),
            (
                "count_if",
                AggregateSignature::new(ArgumentSpec::Any, AggregateType::Number),
            ),
            (
                "failure_count",
                AggregateSignature::new(ArgumentSpec::None, AggregateType::Number),
            ),
            (
                "failure_rate",
                AggregateSignature::new(ArgumentSpec::None, AggregateType::Percentage),
            ),
            (
                "apdex",
                AggregateSignature::new(ArgumentSpec::Any, AggregateType::Number),
            ),
            (
                "user_misery",
                AggregateSignature::new(ArgumentSpec::Any, AggregateType::Number),
            ),
            (
                "epm",
                AggregateSignature::new(ArgumentSpec::None, AggregateType::Number),
            ),
            (
                "eps",
                AggregateSignature::new(ArgumentSpec::None, AggregateType::Number),
            ),
            (
                "last_seen",
                AggregateSignature::new(ArgumentSpec::None, AggregateType::Date),
            ),
            (
                "avg",
                AggregateSignature::new(duration_fields(), AggregateType::Duration),
            ),
            (
                "sum",
                AggregateSignature::new(duration_fields(), AggregateType::Duration),
            ),
            (
                "min",
                AggregateSignature::new(duration_fields(), AggregateType::Duration),
            ),
            (
                "max",
                AggregateSignature::new(duration_fields(), AggregateType::Duration),
            ),
            (
                "p50",
                AggregateSignature::new(duration_fields(), AggregateType::Duration),
            ),
            (
                "p75",
                AggregateSignature::new(duration_fields(), AggregateType::Duration),
            ),
            (
                "p95",
                AggregateSignature::new(duration_fields(), AggregateType::Duration),
            ),
            (
                "p99",
                AggregateSignature::new(duration_fields(), AggregateType::Duration),
            ),
            (
                "p100",
                AggregateSignature::new(duration_fields(), AggregateType::Duration),
            ),
            (
                "percentile",
                AggregateSignature::new(duration_fields(), AggregateType::Duration),
            ),
        ] {
            config.aggregates.insert(name.to_string(), signature);
        }
        config
    }
}

impl SearchConfig {
    /// Registry with no known aggregates. Every aggregate filter parsed
    /// against it flags as unsupported.
    pub fn empty() -> Self {
        Self {
            aggregates: HashMap::new(),
        }
    }

    /// Register or replace an aggregate signature.
    pub fn with_aggregate(mut self, name: &str, signature: AggregateSignature) -> Self {
        self.aggregates.insert(name.to_string(), signature);
        self
    }

    pub(crate) fn return_type(&self, name: &str) -> Option<AggregateType> {
        self.aggregates.get(name).map(|signature| signature.returns)
    }

    /// Semantic checks for an aggregate filter. The first failing rule
    /// wins; only one reason is ever recorded.
    pub(crate) fn validate_aggregate(
        &self,
        key: &KeyAggregate,
        value: &Value,
    ) -> Option<InvalidReason> {
        let name = key.name.value.as_str();
        let Some(signature) = self.aggregates.get(name) else {
            let mut reason = format!("'{name}' is not a supported aggregate function.");
            if let Some(candidate) = did_you_mean(name, self.aggregates.keys()) {
                reason.push_str(&format!(" Did you mean '{candidate}'?"));
            }
            return Some(InvalidReason::new(reason));
        };

        let argument = key.first_arg().map(|param| param.value.as_str());
        match &signature.arguments {
            ArgumentSpec::None => {
                if argument.is_some() {
                    return Some(InvalidReason::new(format!(
                        "'{name}' does not take any arguments."
                    )));
                }
            }
            ArgumentSpec::OneOf(allowed) => match argument {
                Some(argument) if !allowed.iter().any(|a| a == argument) => {
                    return Some(InvalidReason::new(format!(
                        "'{name}' is not expecting '{argument}' as an argument."
                    )));
                }
                None => {
                    return Some(InvalidReason::new(format!("'{name}' requires an argument.")));
                }
                _ => {}
            },
            ArgumentSpec::Any => {}
        }

        if !return_type_matches(signature.returns, value) {
            return Some(InvalidReason::new(format!(
                "'{name}' returns a {}; '{}' is not valid here.",
                signature.returns.describe(),
                value.text(),
            )));
        }

        None
    }
}

fn return_type_matches(returns: AggregateType, value: &Value) -> bool {
    match (returns, value) {
        // Plain numbers may carry a magnitude suffix but not a duration one.
        (AggregateType::Number, Value::Number(number)) => !number.has_duration_unit(),
        (AggregateType::Duration, Value::Number(_)) => true,
        (AggregateType::Percentage, Value::Percentage(_)) => true,
        (AggregateType::Date, Value::Iso8601Date(_) | Value::RelativeDate(_)) => true,
        (AggregateType::String, Value::Text(_)) => true,
        _ => false,
    }
}

/// Best candidate within a length-scaled Levenshtein threshold.
fn did_you_mean<'a>(input: &str, candidates: impl Iterator<Item = &'a String>) -> Option<String> {
    let mut best_match = None;
    let mut min_dist = usize::MAX;

    for cand in candidates {
        let dist = levenshtein(input, cand);

        // Dynamic threshold based on length
        let threshold = match input.len() {
            0..=2 => 0,
            3..=5 => 2,
            _ => 3,
        };

        if dist <= threshold && dist < min_dist {
            min_dist = dist;
            best_match = Some(cand.clone());
        }
    }

    best_match
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{
        AggregateArg, KeyAggregateArgs, KeyAggregateParam, ValueNumber, ValuePercentage,
        ValueText,
    };

    fn aggregate(name: &str, arg: Option<&str>) -> KeyAggregate {
        let mut key = KeyAggregate::default();
        key.name.value = name.to_string();
        if let Some(arg) = arg {
            key.args = Some(KeyAggregateArgs {
                args: vec![AggregateArg {
                    separator: String::new(),
                    value: KeyAggregateParam {
                        value: arg.to_string(),
                        ..Default::default()
                    },
                }],
                ..Default::default()
            });
        }
        key
    }

    fn number(text: &str, unit: Option<&str>) -> Value {
        Value::Number(ValueNumber {
            text: text.to_string(),
            value: text.to_string(),
            raw_value: 0.0,
            unit: unit.map(str::to_string),
            ..Default::default()
        })
    }

    #[test]
    fn test_no_argument_aggregate_rejects_args() {
        let config = SearchConfig::default();
        let reason = config
            .validate_aggregate(&aggregate("count", Some("202")), &number("200", None))
            .unwrap();
        assert_eq!(reason.reason, "'count' does not take any arguments.");
    }

    #[test]
    fn test_fixed_set_aggregate_rejects_unknown_field() {
        let config = SearchConfig::default();
        let reason = config
            .validate_aggregate(&aggregate("p95", Some("user.id")), &number("200", None))
            .unwrap();
        assert_eq!(
            reason.reason,
            "'p95' is not expecting 'user.id' as an argument."
        );
    }

    #[test]
    fn test_fixed_set_aggregate_requires_argument() {
        let config = SearchConfig::default();
        let reason = config
            .validate_aggregate(&aggregate("p95", None), &number("200", None))
            .unwrap();
        assert_eq!(reason.reason, "'p95' requires an argument.");
    }

    #[test]
    fn test_return_type_mismatch_quotes_value_text() {
        let config = SearchConfig::default();
        let value = Value::Percentage(ValuePercentage {
            text: "23%".to_string(),
            value: 23.0,
            ..Default::default()
        });
        let reason = config
            .validate_aggregate(&aggregate("count", None), &value)
            .unwrap();
        assert_eq!(
            reason.reason,
            "'count' returns a number; '23%' is not valid here."
        );
    }

    #[test]
    fn test_duration_return_accepts_bare_and_suffixed_numbers() {
        let config = SearchConfig::default();
        let key = aggregate("p95", Some("transaction.duration"));
        assert_eq!(config.validate_aggregate(&key, &number("300", None)), None);
        assert_eq!(
            config.validate_aggregate(&key, &number("300", Some("ms"))),
            None
        );
    }

    #[test]
    fn test_number_return_rejects_duration_suffix() {
        let config = SearchConfig::default();
        let reason = config
            .validate_aggregate(&aggregate("count", None), &number("500ms", Some("ms")))
            .unwrap();
        assert_eq!(
            reason.reason,
            "'count' returns a number; '500ms' is not valid here."
        );
    }

    #[test]
    fn test_unknown_aggregate_suggests_candidate() {
        let config = SearchConfig::default();
        let reason = config
            .validate_aggregate(&aggregate("coutn", None), &number("1", None))
            .unwrap();
        assert_eq!(
            reason.reason,
            "'coutn' is not a supported aggregate function. Did you mean 'count'?"
        );
    }

    #[test]
    fn test_unknown_aggregate_without_candidate() {
        let config = SearchConfig::empty();
        let reason = config
            .validate_aggregate(&aggregate("zzzzzz", None), &number("1", None))
            .unwrap();
        assert_eq!(reason.reason, "'zzzzzz' is not a supported aggregate function.");
    }

    #[test]
    fn test_string_return_accepts_text() {
        let config = SearchConfig::empty().with_aggregate(
            "any_value",
            AggregateSignature::new(ArgumentSpec::Any, AggregateType::String),
        );
        let value = Value::Text(ValueText {
            text: "release-1".to_string(),
            value: "release-1".to_string(),
            ..Default::default()
        });
        assert_eq!(
            config.validate_aggregate(&aggregate("any_value", Some("release")), &value),
            None
        );
    }
}
