use std::sync::Arc;

use query_spec_core::{Error, Result, SearchSpec};

use crate::predicate::{always, any_of, Predicate};
use crate::resolver::{resolve, PropertyPath};
use crate::schema::{Entity, Shape};

/// First-level fields that take part in keyword search when no explicit
/// fields are given. See
/// [`FieldKind::is_keyword_searchable`](crate::schema::FieldKind::is_keyword_searchable).
pub fn searchable_fields(shape: &'static Shape) -> Vec<PropertyPath> {
    shape
        .fields
        .iter()
        .filter(|def| def.kind.is_keyword_searchable())
        .map(PropertyPath::first_level)
        .collect()
}

/// Compile one keyword search. Matching is always a case-insensitive
/// substring test, OR-ed across the target fields.
pub fn compile_search<T: Entity>(spec: &SearchSpec) -> Result<Predicate<T>> {
    let Some(keyword) = spec.effective_keyword() else {
        return Ok(always());
    };

    let targets = if spec.fields.is_empty() {
        searchable_fields(T::shape())
    } else {
        spec.fields
            .iter()
            .map(|field| {
                let path = resolve(T::shape(), field)?;
                if path.kind().is_object() {
                    return Err(Error::NotSearchable(path.path().to_string()));
                }
                Ok(path)
            })
            .collect::<Result<Vec<_>>>()?
    };

    if targets.is_empty() {
        return Ok(always());
    }

    let needle = keyword.to_lowercase();
    Ok(Arc::new(move |item: &T| {
        targets.iter().any(|path| {
            path.read(item)
                .to_text(path.kind())
                .is_some_and(|text| text.to_lowercase().contains(&needle))
        })
    }))
}

/// Compile several searches into one OR group. Specs without a keyword are
/// ignored; `None` when nothing is left to search for.
pub fn compile_search_group<T: Entity>(specs: &[SearchSpec]) -> Result<Option<Predicate<T>>> {
    let mut compiled = specs
        .iter()
        .filter(|s| s.effective_keyword().is_some())
        .map(compile_search::<T>)
        .collect::<Result<Vec<_>>>()?;

    Ok(match compiled.len() {
        0 => None,
        1 => compiled.pop(),
        _ => Some(any_of(compiled)),
    })
}
