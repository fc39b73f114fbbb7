//! Value sources that fill leaf nodes.
//!
//! A source receives the [`Leaves`] of a walked schema, looks each leaf up by
//! its composite key and, when it finds text, coerces and records it. Sources
//! never see interior nodes and leave leaves they do not recognise alone.

mod args;
mod env;

pub use args::ArgSource;
pub use env::EnvSource;

use crate::error::ConfigResult;
use crate::walk::Leaves;

/// Separator joining key fragments unless a source is told otherwise.
pub const DEFAULT_SEPARATOR: &str = "_";

/// A named origin of configuration values.
pub trait Source {
    /// Short name used in diagnostics, e.g. `env`.
    fn name(&self) -> &str;

    /// Record values for every leaf this source recognises.
    ///
    /// Implementations should keep going after a coercion failure so a
    /// single report lists every malformed value.
    ///
    /// # Errors
    ///
    /// Returns the failures encountered, aggregated when there are several.
    fn fill(&mut self, leaves: &mut Leaves<'_>) -> ConfigResult<()>;
}

impl<S: Source + ?Sized> Source for &mut S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fill(&mut self, leaves: &mut Leaves<'_>) -> ConfigResult<()> {
        (**self).fill(leaves)
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fill(&mut self, leaves: &mut Leaves<'_>) -> ConfigResult<()> {
        (**self).fill(leaves)
    }
}
