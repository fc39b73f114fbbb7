//! Test helpers shared across the nestconf crates.
//!
//! Loading from the process environment touches global state, so tests that
//! exercise `EnvSource::new` set their variables through [`env`] guards.

pub mod env;
