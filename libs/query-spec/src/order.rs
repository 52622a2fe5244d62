use std::cmp::Ordering;
use std::sync::Arc;

use query_spec_core::{Error, OrderBy, Result, SortDir};

use crate::resolver::{resolve, PropertyPath};
use crate::schema::{Entity, FieldValue};

/// Compiled multi-key sort over `T`.
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Compare two field values in their common representation.
///
/// Null sorts before everything, strings compare ordinally, integers of
/// different signedness compare exactly and floats compare numerically.
/// Values of unrelated kinds (and NaN) are incomparable.
pub fn compare_values(a: &FieldValue<'_>, b: &FieldValue<'_>) -> Option<Ordering> {
    use FieldValue as V;
    match (a, b) {
        (V::Null, V::Null) => Some(Ordering::Equal),
        (V::Null, _) => Some(Ordering::Less),
        (_, V::Null) => Some(Ordering::Greater),

        (V::String(x), V::String(y)) => Some(x.cmp(y)),
        (V::I64(x), V::I64(y)) => Some(x.cmp(y)),
        (V::U64(x), V::U64(y)) => Some(x.cmp(y)),
        (V::I64(x), V::U64(y)) => Some(i128::from(*x).cmp(&i128::from(*y))),
        (V::U64(x), V::I64(y)) => Some(i128::from(*x).cmp(&i128::from(*y))),
        (V::F64(x), V::F64(y)) => x.partial_cmp(y),
        (V::F64(x), V::I64(y)) => x.partial_cmp(&(*y as f64)),
        (V::F64(x), V::U64(y)) => x.partial_cmp(&(*y as f64)),
        (V::I64(x), V::F64(y)) => (*x as f64).partial_cmp(y),
        (V::U64(x), V::F64(y)) => (*x as f64).partial_cmp(y),
        (V::Decimal(x), V::Decimal(y)) => Some(x.cmp(y)),
        (V::Bool(x), V::Bool(y)) => Some(x.cmp(y)),
        (V::Uuid(x), V::Uuid(y)) => Some(x.cmp(y)),
        (V::DateTime(x), V::DateTime(y)) => Some(x.cmp(y)),
        (V::Date(x), V::Date(y)) => Some(x.cmp(y)),
        (V::Time(x), V::Time(y)) => Some(x.cmp(y)),
        (V::Enum(x), V::Enum(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Compile `order` into a comparator. The first key is primary; each
/// following key only breaks ties left by the ones before it.
pub fn compile_order<T: Entity>(order: &OrderBy) -> Result<Comparator<T>> {
    let keys = order
        .0
        .iter()
        .map(|key| {
            let path = resolve(T::shape(), &key.field)?;
            if path.kind().is_object() {
                return Err(Error::NotComparable(path.path().to_string()));
            }
            Ok((path, key.dir))
        })
        .collect::<Result<Vec<(PropertyPath, SortDir)>>>()?;

    Ok(Arc::new(move |a: &T, b: &T| {
        for (path, dir) in &keys {
            let ord = compare_values(&path.read(a), &path.read(b)).unwrap_or(Ordering::Equal);
            let ord = match dir {
                SortDir::Asc => ord,
                SortDir::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }))
}
