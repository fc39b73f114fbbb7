//! Helpers for classifying external errors.

use clap::{Error as ClapError, error::ErrorKind};

/// Returns `true` when a [`clap::Error`] corresponds to `--help` or
/// `--version`.
///
/// [`ArgSource`](crate::ArgSource) can register a help flag; entry points
/// then inspect the error to print the usage and exit successfully instead of
/// reporting a failure.
#[must_use]
pub fn is_display_request(err: &ClapError) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    )
}
