//! Structural failures: self-referential schemas and non-record roots.

use anyhow::{Result, anyhow, ensure};
use nestconf::walk::Leaves;
use nestconf::{ConfigError, ConfigResult, EnvSource, NestConfig, Source, get_config};
use rstest::rstest;

#[derive(Debug, Default, NestConfig)]
struct Node {
    #[nestconf(arg = "value")]
    value: String,
    #[nestconf(arg = "left")]
    left: Option<Box<Node>>,
    #[nestconf(arg = "right")]
    right: Option<Box<Node>>,
}

#[derive(Debug, Default, NestConfig)]
struct Wrapper {
    name: String,
    tree: Option<Node>,
}

#[derive(Debug, Default, NestConfig)]
struct Chain {
    next: Option<Box<Link>>,
}

#[derive(Debug, Default, NestConfig)]
struct Link {
    back: Option<Box<Chain>>,
    label: String,
}

#[derive(Debug, Default, NestConfig)]
struct Forest {
    #[nestconf(skip)]
    children: Option<Box<Forest>>,
    trees: Vec<Forest>,
    name: String,
}

/// Records whether it was ever asked to fill.
#[derive(Debug, Default)]
struct Recorder {
    called: bool,
}

impl Source for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn fill(&mut self, _leaves: &mut Leaves<'_>) -> ConfigResult<()> {
        self.called = true;
        Ok(())
    }
}

#[rstest]
fn self_reference_fails_before_sources_run() -> Result<()> {
    let mut recorder = Recorder::default();
    let err = get_config::<Node>(&mut [&mut recorder])
        .err()
        .ok_or_else(|| anyhow!("recursive schema must be rejected"))?;
    ensure!(matches!(err, ConfigError::Cycle { .. }), "unexpected error: {err:?}");
    ensure!(err.to_string().starts_with("cycle detected"));
    ensure!(!recorder.called, "no source may run");
    Ok(())
}

#[rstest]
fn self_reference_is_rejected_with_no_sources() {
    let result = get_config::<Node>(&mut []);
    assert!(matches!(result, Err(ConfigError::Cycle { .. })));
}

#[rstest]
fn nested_self_reference_is_found() -> Result<()> {
    let err = get_config::<Wrapper>(&mut [])
        .err()
        .ok_or_else(|| anyhow!("recursive branch must be rejected"))?;
    let ConfigError::Cycle { path, type_name } = err else {
        return Err(anyhow!("unexpected error: {err:?}"));
    };
    ensure!(path == "root.tree -> root.tree.left", "got {path}");
    ensure!(type_name.ends_with("Node"), "got {type_name}");
    Ok(())
}

#[rstest]
fn mutual_reference_is_a_cycle() {
    let mut env = EnvSource::from_pairs([("next_label", "x")]);
    let result = get_config::<Chain>(&mut [&mut env]);
    assert!(matches!(result, Err(ConfigError::Cycle { .. })));
}

#[rstest]
fn skipped_recursion_is_not_a_cycle() -> Result<()> {
    let mut env = EnvSource::from_pairs([("name", "oak")]);
    let forest: Forest = get_config(&mut [&mut env])?;
    ensure!(forest.name == "oak");
    ensure!(forest.children.is_none() && forest.trees.is_empty());
    Ok(())
}

#[rstest]
fn scalar_roots_are_rejected() -> Result<()> {
    let mut recorder = Recorder::default();
    let err = get_config::<u32>(&mut [&mut recorder])
        .err()
        .ok_or_else(|| anyhow!("scalar root must be rejected"))?;
    ensure!(
        matches!(err, ConfigError::UnsupportedRoot { type_name: "u32", .. }),
        "unexpected error: {err:?}"
    );
    ensure!(!recorder.called);
    Ok(())
}

#[rstest]
fn collection_roots_are_rejected() {
    let result = get_config::<Vec<String>>(&mut []);
    assert!(matches!(result, Err(ConfigError::UnsupportedRoot { .. })));
}
