//! Constructors and aggregation helpers for `ConfigError`.

use std::sync::Arc;

use super::{AggregatedErrors, ConfigError};
use crate::value::ParseScalarError;

impl ConfigError {
    /// Tries to build a [`ConfigError`] from an iterator of errors.
    ///
    /// The iterator is consumed eagerly. It returns:
    /// * `None` when no errors are supplied;
    /// * the inner error when a single [`Arc`] is uniquely owned;
    /// * [`Self::Aggregate`] containing that single [`Arc`] when the error is already shared; and
    /// * [`Self::Aggregate`] combining every error for two or more inputs.
    ///
    /// Nested aggregates are flattened so a report never contains another
    /// report.
    #[must_use]
    pub fn try_aggregate<I, E>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        let mut arcs: Vec<Arc<Self>> = Vec::new();
        for error in errors {
            let arc = error.into();
            match Arc::try_unwrap(arc) {
                Ok(Self::Aggregate(inner)) => arcs.extend(inner.into_shared()),
                Ok(other) => arcs.push(Arc::new(other)),
                Err(shared) => arcs.push(shared),
            }
        }
        if arcs.is_empty() {
            return None;
        }
        Some(if arcs.len() == 1 {
            let last = arcs.pop()?;
            match Arc::try_unwrap(last) {
                Ok(err) => err,
                Err(shared) => Self::Aggregate(Box::new(AggregatedErrors::new(vec![shared]))),
            }
        } else {
            Self::Aggregate(Box::new(AggregatedErrors::new(arcs)))
        })
    }

    /// Build a [`ConfigError`] from at least one error.
    ///
    /// # Panics
    ///
    /// Panics if `errors` is empty. Use [`ConfigError::try_aggregate`] when
    /// the list may be empty.
    #[must_use]
    #[track_caller]
    pub fn aggregate<I, E>(errors: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        Self::try_aggregate(errors).map_or_else(
            || panic!("aggregate requires at least one error"),
            |err| err,
        )
    }

    /// Construct a coercion error reported by `source_name` for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nestconf::{ConfigError, ScalarKind};
    /// let parse = ScalarKind::Bool.coerce("maybe").unwrap_err();
    /// let e = ConfigError::coercion("env", "BOOL_FIELD", parse);
    /// assert!(matches!(e, ConfigError::Coercion { .. }));
    /// ```
    #[must_use]
    pub fn coercion(
        source_name: impl Into<String>,
        key: impl Into<String>,
        error: ParseScalarError,
    ) -> Self {
        Self::Coercion {
            source_name: source_name.into(),
            key: key.into(),
            error,
        }
    }

    /// Iterate over the individual failures, expanding aggregates.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &Self> + '_> {
        match self {
            Self::Aggregate(inner) => Box::new(inner.iter()),
            other => Box::new(std::iter::once(other)),
        }
    }
}

impl From<clap::Error> for ConfigError {
    fn from(e: clap::Error) -> Self {
        Self::CliParsing(Box::new(e))
    }
}
