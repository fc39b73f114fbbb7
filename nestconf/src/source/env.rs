//! Environment variable source.

use std::collections::HashMap;
use std::env::{self, VarError};

use tracing::{debug, trace};

use super::{DEFAULT_SEPARATOR, Source};
use crate::error::{ConfigError, ConfigResult};
use crate::schema::Tag;
use crate::walk::Leaves;

#[derive(Debug, Clone)]
enum Lookup {
    Process,
    Fixed(HashMap<String, String>),
}

/// Reads leaves from environment variables.
///
/// The variable name is the leaf's `env` key fragments joined with `_`, so a
/// field tagged `env = "PORT"` inside a field tagged `env = "SERVER"` reads
/// `SERVER_PORT`.
///
/// # Examples
///
/// ```
/// use nestconf::{EnvSource, NestConfig, get_config};
///
/// #[derive(Debug, Default, PartialEq, NestConfig)]
/// struct Server {
///     #[nestconf(env = "PORT")]
///     port: u16,
/// }
///
/// let mut env = EnvSource::from_pairs([("PORT", "8080")]);
/// let server: Server = get_config(&mut [&mut env]).unwrap();
/// assert_eq!(server.port, 8080);
/// ```
#[derive(Debug, Clone)]
pub struct EnvSource {
    lookup: Lookup,
    separator: String,
    prefix: String,
}

impl EnvSource {
    /// Read from the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_lookup(Lookup::Process)
    }

    /// Read from a fixed set of variables instead of the process environment.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::with_lookup(Lookup::Fixed(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        ))
    }

    fn with_lookup(lookup: Lookup) -> Self {
        Self {
            lookup,
            separator: DEFAULT_SEPARATOR.to_owned(),
            prefix: String::new(),
        }
    }

    /// Join key fragments with `separator` instead of `_`.
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Prepend `prefix` verbatim to every variable name, e.g. `APP_`.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn read(&self, key: &str) -> ConfigResult<Option<String>> {
        match &self.lookup {
            Lookup::Fixed(vars) => Ok(vars.get(key).cloned()),
            Lookup::Process => match env::var(key) {
                Ok(value) => Ok(Some(value)),
                Err(VarError::NotPresent) => Ok(None),
                Err(VarError::NotUnicode(_)) => Err(ConfigError::Env {
                    key: key.to_owned(),
                }),
            },
        }
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for EnvSource {
    fn name(&self) -> &str {
        "env"
    }

    fn fill(&mut self, leaves: &mut Leaves<'_>) -> ConfigResult<()> {
        let mut errors = Vec::new();
        let mut found = 0_usize;
        for mut leaf in leaves.iter_mut() {
            let key = format!("{}{}", self.prefix, leaf.key(Tag::Env, &self.separator));
            let text = match self.read(&key) {
                Ok(Some(text)) => text,
                Ok(None) => continue,
                Err(err) => {
                    errors.push(err);
                    continue;
                }
            };
            trace!(key = %key, path = leaf.path(), "environment variable found");
            match leaf.set_text(&text) {
                Ok(()) => found += 1,
                Err(err) => errors.push(ConfigError::coercion(self.name(), key, err)),
            }
        }
        debug!(found, failed = errors.len(), "environment source applied");
        ConfigError::try_aggregate(errors).map_or(Ok(()), Err)
    }
}
