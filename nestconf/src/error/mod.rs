//! Error types produced by the configuration loader.

mod aggregate;
mod constructors;
mod helpers;
mod types;

pub use aggregate::AggregatedErrors;
pub use helpers::is_display_request;
pub use types::{ConfigError, ConfigResult};

#[cfg(test)]
mod tests;
