//! Primary error enum for configuration loading.

use thiserror::Error;

use super::aggregate::AggregatedErrors;
use crate::value::{ParseScalarError, ScalarKind};

/// Result alias used throughout the crate.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The target type does not dereference to a record.
    #[error("only record types are supported, but got {type_name} ({kind})")]
    UnsupportedRoot {
        /// Rust name of the rejected type.
        type_name: &'static str,
        /// Structural kind the root resolved to.
        kind: String,
    },

    /// A record type appears among its own ancestors.
    #[error("cycle detected: {path}")]
    Cycle {
        /// Field path from the first occurrence of the type to its repeat.
        path: String,
        /// Rust name of the recurring record type.
        type_name: &'static str,
    },

    /// A source found text for a leaf but could not parse it.
    #[error("{source_name} value for '{key}' is invalid: {error}")]
    Coercion {
        /// Name of the source reporting the failure.
        source_name: String,
        /// Composite key the source looked up.
        key: String,
        /// Underlying parse failure.
        #[source]
        error: ParseScalarError,
    },

    /// Error parsing command-line arguments.
    #[error("failed to parse command-line arguments: {0}")]
    CliParsing(#[from] Box<clap::Error>),

    /// An environment variable is present but not valid Unicode.
    #[error("environment variable '{key}' is not valid unicode")]
    Env {
        /// Variable name.
        key: String,
    },

    /// Two leaves resolve to the same key for one source.
    #[error("{source_name} key '{key}' is claimed by both '{first}' and '{second}'")]
    DuplicateKey {
        /// Name of the source that detected the clash.
        source_name: String,
        /// The clashing key.
        key: String,
        /// Field path of the leaf that registered the key first.
        first: String,
        /// Field path of the leaf that clashed.
        second: String,
    },

    /// A resolved value could not be stored in its field.
    #[error("unsupported field type for '{path}': cannot store a {kind} value")]
    UnsupportedFieldType {
        /// Field path of the leaf.
        path: String,
        /// Kind of the value that was offered.
        kind: ScalarKind,
    },

    /// A record's field accessors disagree with its schema.
    #[error("cannot reach field '{path}' while writing configuration")]
    Unreachable {
        /// Field path that could not be reached.
        path: String,
    },

    /// Multiple errors occurred while loading configuration.
    #[error("multiple configuration errors:\n{0}")]
    Aggregate(Box<AggregatedErrors>),
}
