//! Parsing utilities for the `NestConfig` derive macro.
//!
//! The struct and its `#[nestconf(...)]` attributes are read in one pass so
//! expansion fails fast with a spanned error.

use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, Type};

mod literals;

use literals::{fragment, lit_str};

/// Struct-level attributes recognised by `#[derive(NestConfig)]`.
#[derive(Default, Clone)]
pub(crate) struct StructAttrs {
    /// Overrides the runtime crate path for dependency aliasing.
    ///
    /// When set via `#[nestconf(crate = "my_alias")]`, generated code
    /// references types through `my_alias::` instead of `::nestconf::`.
    pub crate_path: Option<syn::Path>,
}

/// Field-level attributes recognised by `#[derive(NestConfig)]`.
///
/// - `env`/`arg` override the key fragment contributed for that source.
/// - `skip` removes the field from the schema entirely.
#[derive(Default, Clone)]
pub(crate) struct FieldAttrs {
    pub env: Option<LitStr>,
    pub arg: Option<LitStr>,
    pub skip: bool,
}

/// One named field with its parsed attributes.
#[derive(Clone)]
pub(crate) struct ParsedField {
    pub ident: syn::Ident,
    pub ty: Type,
    pub attrs: FieldAttrs,
}

impl ParsedField {
    /// Field name as written in key fragments, without any `r#` prefix.
    pub(crate) fn name(&self) -> String {
        self.ident.unraw().to_string()
    }
}

/// Everything the generator needs from the input struct.
pub(crate) struct ParsedInput {
    pub ident: syn::Ident,
    pub attrs: StructAttrs,
    pub fields: Vec<ParsedField>,
}

/// Iterate all `#[nestconf(...)]` attributes once and apply a callback.
fn parse_nestconf<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&syn::meta::ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("nestconf")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

fn unknown_key(meta: &syn::meta::ParseNestedMeta) -> syn::Error {
    let key = meta
        .path
        .get_ident()
        .map_or_else(|| "attribute".to_owned(), ToString::to_string);
    meta.error(format!("unknown nestconf key `{key}`"))
}

/// Extracts `#[nestconf(...)]` metadata applied to a struct.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    parse_nestconf(attrs, |meta| {
        if meta.path.is_ident("crate") {
            let literal = lit_str(meta, "crate")?;
            out.crate_path = Some(literal.parse()?);
            Ok(())
        } else {
            Err(unknown_key(meta))
        }
    })?;
    Ok(out)
}

/// Extracts `#[nestconf(...)]` metadata applied to a field.
pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_nestconf(attrs, |meta| {
        if meta.path.is_ident("env") {
            out.env = Some(fragment(meta, "env")?);
        } else if meta.path.is_ident("arg") {
            out.arg = Some(fragment(meta, "arg")?);
        } else if meta.path.is_ident("skip") {
            out.skip = true;
        } else {
            return Err(unknown_key(meta));
        }
        Ok(())
    })?;
    Ok(out)
}

/// Gathers the struct identifier, its named fields and all attribute
/// metadata, rejecting input the derive cannot describe.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<ParsedInput> {
    let ident = input.ident.clone();
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "NestConfig does not support generic structs",
        ));
    }
    let attrs = parse_struct_attrs(&input.attrs)?;
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "NestConfig requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                ident,
                "NestConfig can only be derived for structs",
            ));
        }
    };

    let mut fields = Vec::with_capacity(named.len());
    for field in named {
        let Some(field_ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "NestConfig requires named fields"));
        };
        fields.push(ParsedField {
            ident: field_ident,
            ty: field.ty.clone(),
            attrs: parse_field_attrs(&field.attrs)?,
        });
    }
    Ok(ParsedInput {
        ident,
        attrs,
        fields,
    })
}
