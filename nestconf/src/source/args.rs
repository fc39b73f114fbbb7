//! Command-line flag source backed by `clap`.

use std::collections::HashMap;
use std::ffi::OsString;

use clap::{Arg, ArgAction, Command, value_parser};
use tracing::{debug, trace};

use super::{DEFAULT_SEPARATOR, Source};
use crate::error::{ConfigError, ConfigResult};
use crate::schema::Tag;
use crate::walk::Leaves;

const RESIDUAL_ID: &str = "__nestconf_residual";
const HELP_FLAG: &str = "help";

/// Reads leaves from `--key=value` / `--key value` flags.
///
/// Every leaf is registered as a long flag named after its `arg` key
/// fragments joined with `_`. A flag's value may start with `-`, so
/// `--offset -5` works, and when a flag is repeated the last value wins.
/// Parsing stops at the first positional argument
/// or at `--`; that argument and everything after it is kept as residual
/// input, available from [`ArgSource::residual`] after a load. The argument
/// list is parsed afresh on every load, so one source can serve several.
///
/// # Examples
///
/// ```
/// use nestconf::{ArgSource, NestConfig, get_config};
///
/// #[derive(Debug, Default, NestConfig)]
/// struct Cli {
///     #[nestconf(arg = "verbose")]
///     verbose: bool,
/// }
///
/// let mut args = ArgSource::from_args(["prog", "--verbose=true", "build", "--release"]);
/// let cli: Cli = get_config(&mut [&mut args]).unwrap();
/// assert!(cli.verbose);
/// assert_eq!(args.residual(), ["build", "--release"]);
/// ```
#[derive(Debug, Clone)]
pub struct ArgSource {
    args: Vec<OsString>,
    separator: String,
    program: Option<String>,
    help: bool,
    residual: Vec<String>,
}

impl ArgSource {
    /// Use the process arguments (`std::env::args_os`).
    #[must_use]
    pub fn new() -> Self {
        Self::from_args(std::env::args_os())
    }

    /// Use an explicit argument list. The first item is the program name.
    #[must_use]
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            separator: DEFAULT_SEPARATOR.to_owned(),
            program: None,
            help: false,
            residual: Vec::new(),
        }
    }

    /// Join key fragments with `separator` instead of `_`.
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Name shown in usage and error messages instead of the first argument.
    #[must_use]
    pub fn program_name(mut self, name: impl Into<String>) -> Self {
        self.program = Some(name.into());
        self
    }

    /// Register `-h`/`--help`.
    ///
    /// A help request then surfaces as [`ConfigError::CliParsing`] whose
    /// inner error satisfies [`is_display_request`](crate::is_display_request).
    #[must_use]
    pub const fn with_help(mut self, help: bool) -> Self {
        self.help = help;
        self
    }

    /// Arguments left over after flag parsing in the most recent load.
    #[must_use]
    pub fn residual(&self) -> &[String] {
        &self.residual
    }

    fn command(&self) -> Command {
        let command = match &self.program {
            // clap only derives the binary name from argv[0] when none is set.
            Some(program) => Command::new(program.clone()).bin_name(program.clone()),
            None => Command::new(self.args.first().map_or_else(
                || "program".to_owned(),
                |arg| arg.to_string_lossy().into_owned(),
            )),
        };
        command
            .disable_help_flag(!self.help)
            .disable_version_flag(true)
            .args_override_self(true)
            .arg(
                Arg::new(RESIDUAL_ID)
                    .value_name("ARGS")
                    .num_args(1..)
                    .trailing_var_arg(true)
                    .action(ArgAction::Append)
                    .value_parser(value_parser!(String)),
            )
    }
}

impl Default for ArgSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for ArgSource {
    fn name(&self) -> &str {
        "arg"
    }

    fn fill(&mut self, leaves: &mut Leaves<'_>) -> ConfigResult<()> {
        let mut command = self.command();
        let mut owners: HashMap<String, String> = HashMap::new();
        owners.insert(RESIDUAL_ID.to_owned(), "residual arguments".to_owned());
        if self.help {
            owners.insert(HELP_FLAG.to_owned(), "--help".to_owned());
        }
        for leaf in leaves.iter_mut() {
            let key = leaf.key(Tag::Arg, &self.separator);
            if let Some(first) = owners.get(&key) {
                return Err(ConfigError::DuplicateKey {
                    source_name: self.name().to_owned(),
                    key,
                    first: first.clone(),
                    second: leaf.path().to_owned(),
                });
            }
            command = command.arg(
                Arg::new(key.clone())
                    .long(key.clone())
                    .value_name(leaf.scalar_kind().as_str())
                    .help(leaf.path().to_owned())
                    .action(ArgAction::Set)
                    .allow_hyphen_values(true)
                    .value_parser(value_parser!(String)),
            );
            owners.insert(key, leaf.path().to_owned());
        }

        let matches = command.try_get_matches_from(&self.args)?;
        self.residual = matches
            .get_many::<String>(RESIDUAL_ID)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        let mut errors = Vec::new();
        let mut found = 0_usize;
        for mut leaf in leaves.iter_mut() {
            let key = leaf.key(Tag::Arg, &self.separator);
            let Some(text) = matches.get_one::<String>(&key) else {
                continue;
            };
            trace!(flag = %key, path = leaf.path(), "flag found");
            match leaf.set_text(text) {
                Ok(()) => found += 1,
                Err(err) => errors.push(ConfigError::coercion(self.name(), key, err)),
            }
        }
        debug!(
            found,
            failed = errors.len(),
            residual = self.residual.len(),
            "argument source applied"
        );
        ConfigError::try_aggregate(errors).map_or(Ok(()), Err)
    }
}
