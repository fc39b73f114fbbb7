//! Container for the failures collected over one load.

use std::{error::Error, fmt, sync::Arc};

use super::ConfigError;

/// Collection of [`ConfigError`]s produced during a single load attempt.
///
/// # Examples
///
/// ```
/// use nestconf::{ConfigError, ScalarKind};
/// let e = ConfigError::aggregate(vec![
///     ConfigError::Env { key: "HOME".into() },
///     ConfigError::UnsupportedFieldType { path: "root.port".into(), kind: ScalarKind::Bool },
/// ]);
/// if let ConfigError::Aggregate(agg) = e {
///     assert_eq!(agg.len(), 2);
/// }
/// ```
#[derive(Debug, Default)]
pub struct AggregatedErrors(Vec<Arc<ConfigError>>);

impl AggregatedErrors {
    /// Create a new aggregation from a vector of errors.
    #[must_use]
    pub const fn new(errors: Vec<Arc<ConfigError>>) -> Self {
        Self(errors)
    }

    /// Iterate over the contained errors.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn iter(&self) -> impl Iterator<Item = &ConfigError> {
        self.0.iter().map(Arc::as_ref)
    }

    /// Number of errors in the aggregation.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the aggregation holds no errors.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hands the shared errors back so another aggregation can absorb them.
    pub(super) fn into_shared(self) -> Vec<Arc<ConfigError>> {
        self.0
    }
}

impl fmt::Display for AggregatedErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut separator = "";
        for (number, error) in (1..).zip(self.iter()) {
            write!(f, "{separator}{number}: {error}")?;
            separator = "\n";
        }
        Ok(())
    }
}

impl Error for AggregatedErrors {}
