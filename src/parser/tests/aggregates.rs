use chrono::{TimeZone, Utc};

use crate::validator::{AggregateSignature, AggregateType, ArgumentSpec, SearchConfig};

use super::*;

#[test]
fn test_count_with_percentage_value_flags_return_type() {
    let filter = only_filter("count():>23%");
    assert_eq!(filter.filter, FilterKind::AggregatePercentage);
    assert_eq!(filter.operator, Operator::GreaterThan);
    match &filter.value {
        Value::Percentage(value) => assert_eq!(value.value, 23.0),
        other => panic!("expected percentage, got {other:?}"),
    }
    assert_eq!(
        filter.invalid.as_ref().unwrap().reason,
        "'count' returns a number; '23%' is not valid here."
    );
}

#[test]
fn test_count_with_date_value_flags_return_type() {
    let filter = only_filter("count():2022-03-21");
    assert_eq!(filter.filter, FilterKind::AggregateDate);
    match &filter.value {
        Value::Iso8601Date(value) => {
            assert_eq!(value.value, Utc.with_ymd_and_hms(2022, 3, 21, 0, 0, 0).unwrap());
        }
        other => panic!("expected date, got {other:?}"),
    }
    assert_eq!(
        filter.invalid.as_ref().unwrap().reason,
        "'count' returns a number; '2022-03-21' is not valid here."
    );
}

#[test]
fn test_count_with_relative_date_flags_return_type() {
    let filter = only_filter("count():+1d");
    assert_eq!(filter.filter, FilterKind::AggregateRelativeDate);
    match &filter.value {
        Value::RelativeDate(value) => {
            assert_eq!(value.sign, Sign::Plus);
            assert_eq!(value.value, 1);
            assert_eq!(value.unit, "d");
        }
        other => panic!("expected relative date, got {other:?}"),
    }
    assert_eq!(
        filter.invalid.as_ref().unwrap().reason,
        "'count' returns a number; '+1d' is not valid here."
    );
}

#[test]
fn test_count_with_argument_flags_arity() {
    let filter = only_filter("count(202):>200");
    let aggregate = match &filter.key {
        Key::Aggregate(aggregate) => aggregate,
        other => panic!("expected aggregate key, got {other:?}"),
    };
    let args = aggregate.args.as_ref().unwrap();
    assert_eq!(args.args.len(), 1);
    assert_eq!(args.args[0].separator, "");
    assert_eq!(args.args[0].value.value, "202");
    assert_eq!(
        filter.invalid.as_ref().unwrap().reason,
        "'count' does not take any arguments."
    );
}

#[test]
fn test_arity_check_wins_over_return_type() {
    // The value kind also mismatches, but only the first failing rule is
    // recorded.
    let filter = only_filter("count(202):>23%");
    assert_eq!(
        filter.invalid.as_ref().unwrap().reason,
        "'count' does not take any arguments."
    );
}

#[test]
fn test_p95_rejects_unexpected_argument() {
    let filter = only_filter("p95(user.id):>200");
    assert_eq!(
        filter.invalid.as_ref().unwrap().reason,
        "'p95' is not expecting 'user.id' as an argument."
    );
}

#[test]
fn test_p95_with_accepted_argument_is_valid() {
    let filter = only_filter("p95(transaction.duration):>300ms");
    assert_eq!(filter.filter, FilterKind::AggregateDuration);
    assert_eq!(filter.invalid, None);
}

#[test]
fn test_duration_return_accepts_bare_number() {
    let filter = only_filter("p95(transaction.duration):>300");
    assert_eq!(filter.filter, FilterKind::AggregateDuration);
    assert_eq!(filter.invalid, None);
}

#[test]
fn test_valid_percentage_aggregate() {
    let filter = only_filter("failure_rate():>0.5%");
    assert_eq!(filter.filter, FilterKind::AggregatePercentage);
    assert_eq!(filter.invalid, None);
    match &filter.value {
        Value::Percentage(value) => assert_eq!(value.value, 0.5),
        other => panic!("expected percentage, got {other:?}"),
    }
}

#[test]
fn test_valid_date_aggregates() {
    let filter = only_filter("last_seen():-2d");
    assert_eq!(filter.filter, FilterKind::AggregateRelativeDate);
    assert_eq!(filter.invalid, None);

    let filter = only_filter("last_seen():2022-03-21");
    assert_eq!(filter.filter, FilterKind::AggregateDate);
    assert_eq!(filter.invalid, None);
}

#[test]
fn test_aggregate_arg_spacing_is_preserved() {
    let filter = only_filter("count( 202 ):>200");
    let aggregate = match &filter.key {
        Key::Aggregate(aggregate) => aggregate,
        other => panic!("expected aggregate key, got {other:?}"),
    };
    assert_eq!(aggregate.args_space_before.value, " ");
    assert_eq!(aggregate.args_space_after.value, " ");
    assert_eq!(aggregate.text, "count( 202 )");
}

#[test]
fn test_aggregate_arg_separators_keep_raw_text() {
    let filter = only_filter("count_if(transaction.duration,  300):>1");
    let aggregate = match &filter.key {
        Key::Aggregate(aggregate) => aggregate,
        other => panic!("expected aggregate key, got {other:?}"),
    };
    let args = aggregate.args.as_ref().unwrap();
    assert_eq!(args.args.len(), 2);
    assert_eq!(args.args[0].separator, "");
    assert_eq!(args.args[0].value.value, "transaction.duration");
    assert_eq!(args.args[1].separator, ",  ");
    assert_eq!(args.args[1].value.value, "300");
}

#[test]
fn test_quoted_aggregate_param() {
    let filter = only_filter("count_unique(\"user id\"):>10");
    let aggregate = match &filter.key {
        Key::Aggregate(aggregate) => aggregate,
        other => panic!("expected aggregate key, got {other:?}"),
    };
    let param = aggregate.first_arg().unwrap();
    assert_eq!(param.value, "user id");
    assert!(param.quoted);
}

#[test]
fn test_unknown_aggregate_gets_suggestion() {
    let filter = only_filter("coutn():>3");
    assert_eq!(
        filter.invalid.as_ref().unwrap().reason,
        "'coutn' is not a supported aggregate function. Did you mean 'count'?"
    );
}

#[test]
fn test_missing_required_argument() {
    let filter = only_filter("p95():>300");
    assert_eq!(
        filter.invalid.as_ref().unwrap().reason,
        "'p95' requires an argument."
    );
}

#[test]
fn test_negated_aggregate_filter() {
    let filter = only_filter("!count():99");
    assert!(filter.negated);
    assert_eq!(filter.filter, FilterKind::AggregateNumeric);
    assert_eq!(filter.invalid, None);
}

#[test]
fn test_caller_supplied_registry() {
    let config = SearchConfig::empty().with_aggregate(
        "slowest",
        AggregateSignature::new(ArgumentSpec::Any, AggregateType::Duration),
    );
    let tokens = parse_search_with("slowest(db.query):>2s", &config).unwrap();
    let filter = tokens[1].as_filter().unwrap();
    assert_eq!(filter.filter, FilterKind::AggregateDuration);
    assert_eq!(filter.invalid, None);

    // The built-in names are gone from this registry.
    let tokens = parse_search_with("count():1", &config).unwrap();
    let filter = tokens[1].as_filter().unwrap();
    assert!(
        filter
            .invalid
            .as_ref()
            .unwrap()
            .reason
            .starts_with("'count' is not a supported aggregate function.")
    );
}
