//! Expansion of `#[derive(NestConfig)]`.

mod generate;
mod parse;

use proc_macro2::TokenStream as TokenStream2;
use syn::DeriveInput;

pub(crate) use generate::generate;
pub(crate) use parse::{ParsedField, ParsedInput, parse_input};

/// Parse `input` and generate the trait implementations.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let parsed = parse_input(input)?;
    Ok(generate(&parsed))
}
