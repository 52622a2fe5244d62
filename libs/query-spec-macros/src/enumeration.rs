//! `#[derive(QueryEnum)]` for fieldless enums.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{ext::IdentExt, spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use crate::attrs::{parse_container_attrs, parse_field_attrs};

pub fn query_enum_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let ident = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "QueryEnum cannot be derived for generic types",
        ));
    }

    let variants = match &input.data {
        Data::Enum(data) => &data.variants,
        _ => {
            return Err(Error::new(
                input.span(),
                "QueryEnum can only be derived for enums",
            ))
        }
    };
    if variants.is_empty() {
        return Err(Error::new(
            input.span(),
            "QueryEnum needs at least one variant",
        ));
    }

    let container = parse_container_attrs(&input.attrs)?;

    let mut members: Vec<TokenStream> = Vec::new();
    let mut arms: Vec<TokenStream> = Vec::new();

    for variant in variants.iter() {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new(
                variant.span(),
                "QueryEnum variants cannot carry data",
            ));
        }

        let attrs = parse_field_attrs(&variant.attrs)?;
        if attrs.skip {
            return Err(Error::new(
                attrs.span.unwrap_or_else(|| variant.span()),
                "enum variants cannot be skipped",
            ));
        }

        let v = &variant.ident;
        let name = attrs
            .rename
            .unwrap_or_else(|| container.rename_all.apply(&v.unraw().to_string()));

        members.push(quote! { (#name, #ident::#v as i64) });
        arms.push(quote! { #ident::#v => #ident::#v as i64, });
    }

    let type_name = ident.unraw().to_string();

    Ok(quote! {
        impl ::query_spec::QueryField for #ident {
            const KIND: ::query_spec::FieldKind = {
                const MEMBERS: &[(&str, i64)] = &[#(#members),*];
                const SHAPE: &::query_spec::EnumShape =
                    &::query_spec::EnumShape::new(#type_name, MEMBERS);
                ::query_spec::FieldKind::Enum(SHAPE)
            };

            fn query_value(&self) -> ::query_spec::FieldValue<'_> {
                ::query_spec::FieldValue::Enum(match self {
                    #(#arms)*
                })
            }
        }
    })
}
