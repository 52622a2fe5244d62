//! Derive macros for `query-spec` entities.
//!
//! - [`Entity`](macro@Entity) generates the static shape, the `Record`
//!   accessor and the `Entity` impl for a struct with named fields.
//! - [`QueryEnum`](macro@QueryEnum) describes a fieldless enum so it can be
//!   used as an enumeration field.
//!
//! Field kinds are not spelled out: every field type must implement
//! `query_spec::QueryField`, which the primitives, `Option<T>` and both
//! derives provide. A nested entity field becomes a navigable object.
//!
//! ```ignore
//! use query_spec::{Entity, QueryEnum};
//!
//! #[derive(QueryEnum)]
//! enum Status { Draft, Active }
//!
//! #[derive(Entity)]
//! #[query(rename_all = "camelCase")]
//! struct Product {
//!     name: String,
//!     status: Status,
//!     created_at: chrono::DateTime<chrono::Utc>,
//!     brand: Option<Brand>,
//!     #[query(skip)]
//!     internal_notes: String,
//! }
//! ```

mod attrs;
mod entity;
mod enumeration;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `Record`, `Entity` and `QueryField` for a struct.
///
/// | Attribute | Where | Effect |
/// |-----------|-------|--------|
/// | `rename_all = "camelCase"` | struct | member naming rule (`camelCase`, `snake_case`, `PascalCase`) |
/// | `rename = "..."` | field | explicit member name |
/// | `skip` | field | not queryable |
#[proc_macro_derive(Entity, attributes(query))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::entity_derive_impl(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derives `QueryField` for a fieldless enum. Members are matched by name
/// (case-insensitively) or by discriminant.
///
/// Accepts `rename_all` on the enum and `rename` on variants.
#[proc_macro_derive(QueryEnum, attributes(query))]
pub fn derive_query_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    enumeration::query_enum_derive_impl(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
