//! Loading flat records of primitive fields from arguments and variables.

use anyhow::{Result, anyhow, ensure};
use nestconf::{ArgSource, ConfigError, EnvSource, NestConfig, Source, get_config};
use rstest::rstest;

#[derive(Debug, Default, Clone, PartialEq, NestConfig)]
struct Scalars {
    #[nestconf(arg = "bool_field", env = "BOOL_FIELD")]
    bool_field: bool,
    #[nestconf(arg = "string_field", env = "STRING_FIELD")]
    string_field: String,
    #[nestconf(arg = "int_field", env = "INT_FIELD")]
    int_field: i32,
    #[nestconf(arg = "uint_field", env = "UINT_FIELD")]
    uint_field: u64,
    #[nestconf(arg = "float_field", env = "FLOAT_FIELD")]
    float_field: f64,
}

fn args(flags: &[&str]) -> ArgSource {
    ArgSource::from_args(std::iter::once("prog").chain(flags.iter().copied()))
}

fn load(sources: &mut [&mut dyn Source]) -> Result<Scalars, ConfigError> {
    get_config(sources)
}

#[rstest]
fn flag_sets_only_its_field() -> Result<()> {
    let mut env = EnvSource::from_pairs(Vec::<(String, String)>::new());
    let mut cli = args(&["--bool_field=true"]);
    let loaded = load(&mut [&mut env, &mut cli])?;
    ensure!(
        loaded
            == Scalars {
                bool_field: true,
                ..Scalars::default()
            },
        "unexpected {loaded:?}"
    );
    Ok(())
}

#[rstest]
fn every_primitive_kind_is_coerced() -> Result<()> {
    let mut env = EnvSource::from_pairs([
        ("BOOL_FIELD", "T"),
        ("STRING_FIELD", "hello world"),
        ("INT_FIELD", "-42"),
        ("UINT_FIELD", "18446744073709551615"),
        ("FLOAT_FIELD", "2.5"),
    ]);
    let loaded = load(&mut [&mut env])?;
    ensure!(loaded.bool_field);
    ensure!(loaded.string_field == "hello world");
    ensure!(loaded.int_field == -42);
    ensure!(loaded.uint_field == u64::MAX);
    ensure!(loaded.float_field.to_bits() == 2.5_f64.to_bits());
    Ok(())
}

#[rstest]
#[case::space_separated(&["--string_field", "spaced"], "spaced")]
#[case::equals(&["--string_field=joined"], "joined")]
#[case::empty(&["--string_field="], "")]
fn flag_value_forms(#[case] flags: &[&str], #[case] expected: &str) -> Result<()> {
    let mut cli = args(flags);
    let loaded = load(&mut [&mut cli])?;
    ensure!(loaded.string_field == expected, "got {:?}", loaded.string_field);
    Ok(())
}

#[rstest]
#[case::env_then_args(true, "from-args")]
#[case::args_then_env(false, "from-env")]
fn later_sources_override_earlier(#[case] env_first: bool, #[case] expected: &str) -> Result<()> {
    let mut env = EnvSource::from_pairs([("STRING_FIELD", "from-env"), ("INT_FIELD", "7")]);
    let mut cli = args(&["--string_field=from-args"]);
    let loaded = if env_first {
        load(&mut [&mut env, &mut cli])?
    } else {
        load(&mut [&mut cli, &mut env])?
    };
    ensure!(loaded.string_field == expected, "got {:?}", loaded.string_field);
    ensure!(loaded.int_field == 7, "fields set by one source survive the other");
    Ok(())
}

#[rstest]
fn malformed_flag_fails_without_a_value() -> Result<()> {
    let mut cli = args(&["--bool_field=not_a_bool"]);
    let err = load(&mut [&mut cli])
        .err()
        .ok_or_else(|| anyhow!("malformed flag should fail"))?;
    match &err {
        ConfigError::Coercion {
            source_name, key, ..
        } => {
            ensure!(source_name == "arg");
            ensure!(key == "bool_field");
        }
        other => return Err(anyhow!("unexpected error: {other:?}")),
    }
    ensure!(err.to_string().contains("not_a_bool"));
    Ok(())
}

#[rstest]
fn every_malformed_value_is_reported() -> Result<()> {
    let mut env = EnvSource::from_pairs([
        ("BOOL_FIELD", "maybe"),
        ("INT_FIELD", "forty"),
        ("FLOAT_FIELD", "1.0"),
    ]);
    let mut cli = args(&["--uint_field=-1"]);
    let err = load(&mut [&mut env, &mut cli])
        .err()
        .ok_or_else(|| anyhow!("malformed values should fail"))?;
    let ConfigError::Aggregate(agg) = &err else {
        return Err(anyhow!("expected aggregate, got {err:?}"));
    };
    let keys: Vec<_> = agg
        .iter()
        .filter_map(|e| match e {
            ConfigError::Coercion { key, .. } => Some(key.as_str()),
            _ => None,
        })
        .collect();
    ensure!(keys == ["BOOL_FIELD", "INT_FIELD", "uint_field"], "got {keys:?}");
    Ok(())
}

#[rstest]
fn later_success_does_not_hide_earlier_failure() -> Result<()> {
    let mut env = EnvSource::from_pairs([("INT_FIELD", "wrong")]);
    let mut cli = args(&["--int_field=3"]);
    let err = load(&mut [&mut env, &mut cli])
        .err()
        .ok_or_else(|| anyhow!("earlier failure must surface"))?;
    ensure!(
        matches!(err, ConfigError::Coercion { ref key, .. } if key == "INT_FIELD"),
        "unexpected error: {err:?}"
    );
    Ok(())
}

#[rstest]
fn unknown_flags_are_rejected() -> Result<()> {
    let mut cli = args(&["--nope=1"]);
    let err = load(&mut [&mut cli])
        .err()
        .ok_or_else(|| anyhow!("unknown flag should fail"))?;
    ensure!(matches!(err, ConfigError::CliParsing(_)), "unexpected error: {err:?}");
    Ok(())
}

#[rstest]
fn no_sources_yields_defaults() -> Result<()> {
    ensure!(load(&mut [])? == Scalars::default());
    Ok(())
}

#[rstest]
#[case::negative(&["--int_field", "-5"], -5)]
#[case::negative_joined(&["--int_field=-5"], -5)]
#[case::repeated(&["--int_field=1", "--int_field=2"], 2)]
#[case::repeated_spaced(&["--int_field", "-1", "--int_field", "3"], 3)]
fn signed_and_repeated_flags(#[case] flags: &[&str], #[case] expected: i32) -> Result<()> {
    let mut cli = args(flags);
    let loaded = load(&mut [&mut cli])?;
    ensure!(loaded.int_field == expected, "got {}", loaded.int_field);
    Ok(())
}

#[rstest]
fn string_value_may_start_with_a_dash() -> Result<()> {
    let mut cli = args(&["--string_field", "-verbose", "--bool_field=true"]);
    let loaded = load(&mut [&mut cli])?;
    ensure!(loaded.string_field == "-verbose");
    ensure!(loaded.bool_field);
    Ok(())
}
