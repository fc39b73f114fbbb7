//! Entry points that run the walk, the sources and reconciliation.

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::schema::Describe;
use crate::source::Source;
use crate::walk::Tree;

/// Load a fresh `T::default()` from `sources`, applied in order.
///
/// Later sources override earlier ones for the same leaf.
///
/// # Errors
///
/// Fails when `T` is not a record, when its schema is self-referential, or
/// with every source and coercion failure aggregated into one error. No
/// partially loaded value is returned.
///
/// # Examples
///
/// ```
/// use nestconf::{ArgSource, EnvSource, NestConfig, get_config};
///
/// #[derive(Debug, Default, PartialEq, NestConfig)]
/// struct Limits {
///     #[nestconf(env = "MAX", arg = "max")]
///     max: u32,
/// }
///
/// #[derive(Debug, Default, PartialEq, NestConfig)]
/// struct App {
///     #[nestconf(env = "LIMITS", arg = "limits")]
///     limits: Option<Box<Limits>>,
///     #[nestconf(env = "NAME", arg = "name")]
///     name: String,
/// }
///
/// let mut env = EnvSource::from_pairs([("LIMITS_MAX", "5"), ("NAME", "env")]);
/// let mut args = ArgSource::from_args(["app", "--name=cli"]);
/// let app: App = get_config(&mut [&mut env, &mut args]).unwrap();
/// assert_eq!(app.limits.map(|limits| limits.max), Some(5));
/// assert_eq!(app.name, "cli");
/// ```
pub fn get_config<T: Describe>(sources: &mut [&mut dyn Source]) -> ConfigResult<T> {
    get_config_to(T::default(), sources)
}

/// Load into `existing`, keeping its populated branches as defaults.
///
/// Fields no source sets keep their current values; optional branches that
/// are already `Some` are updated in place rather than replaced.
///
/// # Errors
///
/// As for [`get_config`].
pub fn get_config_to<T: Describe>(
    mut existing: T,
    sources: &mut [&mut dyn Source],
) -> ConfigResult<T> {
    let mut tree = Tree::from_instance(&existing)?;
    tree.ensure_acyclic()?;
    debug!(
        target_type = std::any::type_name::<T>(),
        nodes = tree.nodes().len(),
        sources = sources.len(),
        "loading configuration"
    );

    let mut errors = Vec::new();
    for source in sources.iter_mut() {
        debug!(source = source.name(), "applying source");
        if let Err(err) = source.fill(&mut tree.leaves_mut()) {
            errors.push(err);
        }
    }
    if let Some(err) = ConfigError::try_aggregate(errors) {
        return Err(err);
    }

    tree.reconcile(&mut existing)?;
    Ok(existing)
}

/// Owning builder around [`get_config_to`].
///
/// # Examples
///
/// ```
/// use nestconf::{ConfigLoader, EnvSource, NestConfig};
///
/// #[derive(Debug, Default, NestConfig)]
/// struct App {
///     #[nestconf(env = "DEBUG")]
///     debug: bool,
/// }
///
/// let app: App = ConfigLoader::new()
///     .source(EnvSource::from_pairs([("DEBUG", "1")]))
///     .load()
///     .unwrap();
/// assert!(app.debug);
/// ```
#[derive(Default)]
pub struct ConfigLoader {
    sources: Vec<Box<dyn Source>>,
}

impl ConfigLoader {
    /// Create a loader with no sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `source`; it overrides every source added before it.
    #[must_use]
    pub fn source(mut self, source: impl Source + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Load a fresh `T::default()`.
    ///
    /// # Errors
    ///
    /// As for [`get_config`].
    pub fn load<T: Describe>(&mut self) -> ConfigResult<T> {
        self.load_into(T::default())
    }

    /// Load over `existing`.
    ///
    /// # Errors
    ///
    /// As for [`get_config`].
    pub fn load_into<T: Describe>(&mut self, existing: T) -> ConfigResult<T> {
        let mut borrowed: Vec<&mut dyn Source> = self
            .sources
            .iter_mut()
            .map(|source| source.as_mut() as &mut dyn Source)
            .collect();
        get_config_to(existing, &mut borrowed)
    }
}

impl std::fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigLoader")
            .field(
                "sources",
                &self.sources.iter().map(|source| source.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
