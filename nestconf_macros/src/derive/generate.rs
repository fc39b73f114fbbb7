//! Token generation for `#[derive(NestConfig)]`.

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

use super::{ParsedField, ParsedInput};

/// Path used to reach the runtime crate from generated code.
fn crate_path(input: &ParsedInput) -> TokenStream2 {
    input
        .attrs
        .crate_path
        .as_ref()
        .map_or_else(|| quote!(::nestconf), |path| quote!(#path))
}

/// `FieldSchema` expression for one field.
fn field_schema(krate: &TokenStream2, field: &ParsedField) -> TokenStream2 {
    let name = field.name();
    let ty = &field.ty;
    let env = field.attrs.env.as_ref().map(|lit| {
        quote! { .with_tag(#krate::Tag::Env, #lit) }
    });
    let arg = field.attrs.arg.as_ref().map(|lit| {
        quote! { .with_tag(#krate::Tag::Arg, #lit) }
    });
    quote! {
        #krate::schema::FieldSchema::new(
            #name,
            <#ty as #krate::Describe>::shape(),
        )
        #env
        #arg
    }
}

/// Generate the `Field`, `Describe` and `Record` impls for `input`.
pub(crate) fn generate(input: &ParsedInput) -> TokenStream2 {
    let krate = crate_path(input);
    let ident = &input.ident;
    let visible: Vec<&ParsedField> = input.fields.iter().filter(|f| !f.attrs.skip).collect();

    let schemas = visible.iter().map(|field| field_schema(&krate, field));
    let names: Vec<String> = visible.iter().map(|field| field.name()).collect();
    let idents: Vec<&syn::Ident> = visible.iter().map(|field| &field.ident).collect();

    quote! {
        impl #krate::Field for #ident {
            fn as_record(&self) -> ::core::option::Option<&dyn #krate::Record> {
                ::core::option::Option::Some(self)
            }

            fn as_record_mut(&mut self) -> ::core::option::Option<&mut dyn #krate::Record> {
                ::core::option::Option::Some(self)
            }
        }

        impl #krate::Describe for #ident {
            fn shape() -> #krate::schema::Shape {
                #krate::schema::Shape::record::<Self>()
            }
        }

        impl #krate::Record for #ident {
            fn schema() -> #krate::schema::RecordSchema {
                #krate::schema::RecordSchema::new::<Self>(::std::vec![
                    #( #schemas ),*
                ])
            }

            fn field_ref(&self, name: &str) -> ::core::option::Option<&dyn #krate::Field> {
                match name {
                    #( #names => ::core::option::Option::Some(&self.#idents), )*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_mut(&mut self, name: &str) -> ::core::option::Option<&mut dyn #krate::Field> {
                match name {
                    #( #names => ::core::option::Option::Some(&mut self.#idents), )*
                    _ => ::core::option::Option::None,
                }
            }
        }
    }
}
