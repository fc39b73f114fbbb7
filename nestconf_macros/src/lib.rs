//! Procedural macros for `nestconf`.
//!
//! `#[derive(NestConfig)]` generates the static schema and the field
//! accessors that the loader uses in place of runtime reflection.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive the `Record`, `Field` and `Describe` traits for a struct with named
/// fields.
///
/// The struct must also implement `Default`. Field attributes:
///
/// - `#[nestconf(env = "NAME")]` overrides the environment key fragment;
/// - `#[nestconf(arg = "name")]` overrides the command-line key fragment;
/// - `#[nestconf(skip)]` hides the field from every source.
///
/// Every field that is not skipped must implement `Describe`. Primitives,
/// `String`, derived records, `Option`, `Box`, std collections and a few
/// std types such as `Duration` and `PathBuf` already do; the last two groups
/// are left untouched by every source. For any other type, such as a user
/// enum or a function pointer, mark the field `#[nestconf(skip)]`.
///
/// The struct attribute `#[nestconf(crate = "path")]` points the generated
/// code at a re-export of the runtime crate.
#[proc_macro_derive(NestConfig, attributes(nestconf))]
pub fn derive_nest_config(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
