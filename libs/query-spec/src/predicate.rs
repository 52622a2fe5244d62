//! Filter AST → predicate compiler.

use std::cmp::Ordering;
use std::sync::Arc;

use query_spec_core::ast::{FilterNode, Logic, Op, RawValue};
use query_spec_core::{Error, Result};

use crate::coerce::{coerce, Operand};
use crate::order::compare_values;
use crate::resolver::resolve;
use crate::schema::{Entity, FieldValue};

/// Compiled boolean test over one `T`.
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

pub fn always<T>() -> Predicate<T> {
    Arc::new(|_: &T| true)
}

pub fn and<T: 'static>(a: Predicate<T>, b: Predicate<T>) -> Predicate<T> {
    Arc::new(move |item: &T| a(item) && b(item))
}

pub fn any_of<T: 'static>(preds: Vec<Predicate<T>>) -> Predicate<T> {
    Arc::new(move |item: &T| preds.iter().any(|p| p(item)))
}

/// Compile a filter tree. Composite children are folded left to right with
/// the node's logic; every child is evaluated, so `xor` chains behave as
/// parity.
pub fn compile_filter<T: Entity>(node: &FilterNode) -> Result<Predicate<T>> {
    match node {
        FilterNode::Leaf {
            field,
            operator,
            value,
        } => compile_leaf::<T>(field, *operator, value),
        FilterNode::Composite { logic, children } => {
            let compiled = children
                .iter()
                .map(compile_filter::<T>)
                .collect::<Result<Vec<_>>>()?;
            if compiled.is_empty() {
                return Err(Error::EmptyFilters(logic.to_string()));
            }
            Ok(fold(*logic, compiled))
        }
    }
}

fn fold<T: 'static>(logic: Logic, children: Vec<Predicate<T>>) -> Predicate<T> {
    Arc::new(move |item: &T| {
        children
            .iter()
            .map(|p| p(item))
            .reduce(|acc, next| logic.combine(acc, next))
            .unwrap_or(false)
    })
}

fn compile_leaf<T: Entity>(field: &str, op: Op, raw: &RawValue) -> Result<Predicate<T>> {
    let path = resolve(T::shape(), field)?;
    let kind = path.kind();

    if kind.is_object() {
        // A nested object can only be tested for presence.
        return match (op, raw) {
            (Op::Eq, RawValue::Null) => Ok(Arc::new(move |item: &T| path.read(item).is_null())),
            (Op::Neq, RawValue::Null) => {
                Ok(Arc::new(move |item: &T| !path.read(item).is_null()))
            }
            _ => Err(Error::NotComparable(path.path().to_string())),
        };
    }

    if op.is_string_only() && !kind.is_string() {
        return Err(Error::OperatorNotApplicable {
            operator: op.to_string(),
            field: path.path().to_string(),
        });
    }

    let operand = match coerce(kind, path.path(), raw)? {
        Operand::String(s) => Operand::String(s.to_lowercase()),
        other => other,
    };

    Ok(Arc::new(move |item: &T| {
        matches_operand(op, &path.read(item), &operand)
    }))
}

/// Apply `op` to a record value and a coerced operand. String operands are
/// already lower-cased; the record side is lowered here.
fn matches_operand(op: Op, value: &FieldValue<'_>, operand: &Operand) -> bool {
    match (value, operand) {
        (FieldValue::Null, Operand::Null) => op == Op::Eq,
        // null is unequal to every real value and unordered against it
        (FieldValue::Null, _) | (_, Operand::Null) => op == Op::Neq,
        (FieldValue::String(s), Operand::String(needle)) => {
            let hay = s.to_lowercase();
            match op {
                Op::Contains => hay.contains(needle.as_str()),
                Op::StartsWith => hay.starts_with(needle.as_str()),
                Op::EndsWith => hay.ends_with(needle.as_str()),
                relational => relation(relational, Some(hay.as_str().cmp(needle.as_str()))),
            }
        }
        _ => relation(op, compare_values(value, &operand.as_value())),
    }
}

fn relation(op: Op, ord: Option<Ordering>) -> bool {
    match op {
        Op::Eq => ord == Some(Ordering::Equal),
        Op::Neq => ord != Some(Ordering::Equal),
        Op::Lt => ord == Some(Ordering::Less),
        Op::Lte => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
        Op::Gt => ord == Some(Ordering::Greater),
        Op::Gte => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
        Op::Contains | Op::StartsWith | Op::EndsWith => false,
    }
}
