//! `#[derive(Entity)]`: shape table, `Record` accessor and `Entity` impl
//! from one struct definition.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{ext::IdentExt, spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use crate::attrs::{parse_container_attrs, parse_field_attrs};

pub fn entity_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let ident = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Entity cannot be derived for generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Entity can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Entity can only be derived for structs",
            ))
        }
    };

    let container = parse_container_attrs(&input.attrs)?;

    let mut names: Vec<String> = Vec::new();
    let mut defs: Vec<TokenStream> = Vec::new();
    let mut arms: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let name = attrs
            .rename
            .unwrap_or_else(|| container.rename_all.apply(&field_ident.unraw().to_string()));

        // lookups ignore case, so these would shadow each other
        if names.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
            return Err(Error::new(
                field_ident.span(),
                format!("duplicate query field name '{name}'"),
            ));
        }

        let ty = &field.ty;
        defs.push(quote! {
            ::query_spec::FieldDef::new(#name, <#ty as ::query_spec::QueryField>::KIND)
        });
        arms.push(quote! {
            #name => ::query_spec::QueryField::query_value(&self.#field_ident),
        });
        names.push(name);
    }

    let type_name = ident.unraw().to_string();

    Ok(quote! {
        impl ::query_spec::Record for #ident {
            fn field(&self, name: &str) -> ::query_spec::FieldValue<'_> {
                match name {
                    #(#arms)*
                    _ => ::query_spec::FieldValue::Null,
                }
            }
        }

        impl ::query_spec::Entity for #ident {
            fn shape() -> &'static ::query_spec::Shape {
                const FIELDS: &[::query_spec::FieldDef] = &[#(#defs),*];
                static SHAPE: ::query_spec::Shape = ::query_spec::Shape::new(#type_name, FIELDS);
                &SHAPE
            }
        }

        impl ::query_spec::QueryField for #ident {
            const KIND: ::query_spec::FieldKind =
                ::query_spec::FieldKind::Object(<#ident as ::query_spec::Entity>::shape);

            fn query_value(&self) -> ::query_spec::FieldValue<'_> {
                ::query_spec::FieldValue::Object(self)
            }
        }
    })
}
