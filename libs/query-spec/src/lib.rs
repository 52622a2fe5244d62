//! Compiles declarative listing requests (search, filter tree, ordering,
//! paging) into executable specifications over statically described
//! entities.
//!
//! Entities are described with `#[derive(Entity)]`, enumerations with
//! `#[derive(QueryEnum)]`.
//!
//! ```ignore
//! let spec = SpecificationBuilder::from_pagination_filter(&request)?
//!     .build::<Product>()?;
//! let page = spec.paginate(products.iter());
//! ```

pub mod coerce;
pub mod order;
pub mod predicate;
pub mod problem;
pub mod repo;
pub mod resolver;
pub mod schema;
pub mod search;
pub mod service;
pub mod specification;

pub use query_spec_core::{Error, Page, PageInfo, Result};

pub use coerce::{coerce, Operand};
pub use order::{compare_values, compile_order, Comparator};
pub use predicate::{compile_filter, Predicate};
pub use problem::{spec_error_to_problem, Problem};
pub use repo::{InMemoryRepository, Repository};
pub use resolver::{resolve, PropertyPath};
pub use schema::{Entity, EnumShape, FieldDef, FieldKind, FieldValue, QueryField, Record, Shape};
pub use search::{compile_search, compile_search_group, searchable_fields};
pub use service::{QueryError, QueryService};
pub use specification::{BuildOptions, CompiledSpecification, SpecificationBuilder};

pub use query_spec_macros::{Entity, QueryEnum};
