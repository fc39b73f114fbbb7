//! Unit tests for error classification and aggregation behaviour.

use clap::{Command, error::ErrorKind};
use rstest::rstest;
use std::sync::Arc;

use super::{ConfigError, is_display_request};
use crate::value::ScalarKind;

fn build_error(kind: ErrorKind) -> clap::Error {
    Command::new("demo").error(kind, "demo output")
}

fn env_error(key: &str) -> ConfigError {
    ConfigError::Env { key: key.into() }
}

#[rstest]
#[case(ErrorKind::DisplayHelp)]
#[case(ErrorKind::DisplayVersion)]
fn recognises_display_requests(#[case] kind: ErrorKind) {
    let err = build_error(kind);
    assert!(is_display_request(&err));
}

#[rstest]
#[case(ErrorKind::UnknownArgument)]
#[case(ErrorKind::InvalidValue)]
fn rejects_regular_errors(#[case] kind: ErrorKind) {
    let err = build_error(kind);
    assert!(!is_display_request(&err));
}

#[rstest]
fn empty_input_yields_none() {
    assert!(ConfigError::try_aggregate(Vec::<ConfigError>::new()).is_none());
}

#[rstest]
fn single_owned_error_is_unwrapped() {
    let outcome = ConfigError::aggregate(vec![env_error("A")]);
    assert!(
        matches!(outcome, ConfigError::Env { ref key } if key == "A"),
        "expected Env, got {outcome:?}"
    );
}

#[rstest]
fn single_shared_error_stays_wrapped() {
    let shared = Arc::new(env_error("A"));
    let outcome = ConfigError::aggregate(vec![Arc::clone(&shared)]);
    match outcome {
        ConfigError::Aggregate(aggregate) => assert_eq!(aggregate.len(), 1),
        other => panic!("expected Aggregate, got {other:?}"),
    }
}

#[rstest]
fn nested_aggregates_are_flattened() {
    let inner = ConfigError::aggregate(vec![env_error("A"), env_error("B")]);
    let outcome = ConfigError::aggregate(vec![inner, env_error("C")]);
    let keys: Vec<_> = outcome
        .iter()
        .map(|err| match err {
            ConfigError::Env { key } => key.as_str(),
            _ => "",
        })
        .collect();
    assert_eq!(keys, vec!["A", "B", "C"]);
}

#[rstest]
fn aggregate_display_numbers_entries() {
    let outcome = ConfigError::aggregate(vec![
        env_error("A"),
        ConfigError::UnsupportedFieldType {
            path: "root.flag".into(),
            kind: ScalarKind::Bool,
        },
    ]);
    let message = outcome.to_string();
    assert!(message.starts_with("multiple configuration errors:"), "{message}");
    assert!(message.contains("1: environment variable 'A'"), "{message}");
    assert!(message.contains("2: unsupported field type for 'root.flag'"), "{message}");
}

#[rstest]
fn clap_errors_convert_to_cli_parsing() {
    let err: ConfigError = build_error(ErrorKind::UnknownArgument).into();
    assert!(matches!(err, ConfigError::CliParsing(_)));
}

#[rstest]
fn flattening_keeps_shared_errors_shared() {
    let shared = Arc::new(env_error("A"));
    let inner = ConfigError::aggregate(vec![Arc::clone(&shared), Arc::new(env_error("B"))]);
    let outcome = ConfigError::aggregate(vec![inner, env_error("C")]);
    let ConfigError::Aggregate(aggregate) = &outcome else {
        panic!("expected Aggregate, got {outcome:?}");
    };
    assert_eq!(aggregate.len(), 3);
    let first = aggregate.iter().next().expect("first entry");
    assert!(std::ptr::eq(first, shared.as_ref()));
    assert_eq!(aggregate.to_string().lines().count(), 3);
}
