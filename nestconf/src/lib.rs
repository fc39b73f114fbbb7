//! Populate nested configuration structs from environment variables and
//! command-line flags.
//!
//! Derive [`NestConfig`] on every record taking part in a load. Each field
//! contributes one key fragment per source, either its name or the value of
//! its `env`/`arg` tag, and a leaf's composite key is the fragments of all its
//! ancestors joined by the source's separator:
//!
//! ```
//! use nestconf::{ArgSource, EnvSource, NestConfig, get_config};
//!
//! #[derive(Debug, Default, PartialEq, NestConfig)]
//! struct Scalars {
//!     #[nestconf(arg = "string_field", env = "STRING_FIELD")]
//!     string: String,
//! }
//!
//! #[derive(Debug, Default, PartialEq, NestConfig)]
//! struct Outer {
//!     #[nestconf(arg = "first", env = "FIRST")]
//!     first: Option<Box<Scalars>>,
//!     #[nestconf(arg = "second", env = "SECOND")]
//!     second: Option<Box<Scalars>>,
//! }
//!
//! let mut env = EnvSource::from_pairs([("SECOND_STRING_FIELD", "from env")]);
//! let mut args = ArgSource::from_args(["app", "--first_string_field=from flags"]);
//! let outer: Outer = get_config(&mut [&mut env, &mut args]).unwrap();
//! assert_eq!(outer.first.unwrap().string, "from flags");
//! assert_eq!(outer.second.unwrap().string, "from env");
//! ```
//!
//! Only branches that receive a value are allocated; everything else keeps
//! its default.

extern crate self as nestconf;

pub use nestconf_macros::NestConfig;

mod error;
mod load;
pub mod schema;
pub mod source;
mod value;
pub mod walk;

pub use error::{AggregatedErrors, ConfigError, ConfigResult, is_display_request};
pub use load::{ConfigLoader, get_config, get_config_to};
pub use schema::{Describe, Field, Record, Tag};
pub use source::{ArgSource, EnvSource, Source};
pub use value::{ParseScalarError, ScalarKind, ScalarValue};
pub use walk::Tree;
