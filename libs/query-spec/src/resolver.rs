use query_spec_core::{Error, Result};
use tracing::trace;

use crate::schema::{FieldDef, FieldKind, FieldValue, Record, Shape};

/// A dotted member path resolved against a [`Shape`].
///
/// Holds the canonical member names and the leaf kind, so the same path can
/// drive filtering, searching and ordering.
#[derive(Clone, Debug)]
pub struct PropertyPath {
    path: String,
    segments: Vec<&'static str>,
    kind: FieldKind,
}

impl PropertyPath {
    pub(crate) fn first_level(def: &'static FieldDef) -> Self {
        Self {
            path: def.name.to_string(),
            segments: vec![def.name],
            kind: def.kind,
        }
    }

    /// Path as requested by the caller.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn segments(&self) -> &[&'static str] {
        &self.segments
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Read the leaf value. A null object anywhere along the way yields
    /// [`FieldValue::Null`].
    pub fn read<'a>(&self, root: &'a dyn Record) -> FieldValue<'a> {
        let Some((leaf, parents)) = self.segments.split_last() else {
            return FieldValue::Null;
        };
        let mut current = root;
        for segment in parents {
            match current.field(segment) {
                FieldValue::Object(next) => current = next,
                _ => return FieldValue::Null,
            }
        }
        current.field(leaf)
    }
}

/// Walk `path` one segment at a time starting at `root`.
///
/// Every segment must name a member of the current shape, and every
/// segment but the last must be a nested object.
pub fn resolve(root: &'static Shape, path: &str) -> Result<PropertyPath> {
    let path = path.trim();
    let unknown = |member: &str| Error::UnknownMember {
        path: path.to_string(),
        member: member.to_string(),
    };
    if path.is_empty() {
        return Err(unknown(path));
    }

    let mut shape = root;
    let mut segments = Vec::new();
    let mut kind: Option<FieldKind> = None;

    for segment in path.split('.') {
        if let Some(prev) = kind {
            match prev {
                FieldKind::Object(next) => shape = next(),
                _ => return Err(unknown(segment)),
            }
        }
        let def = shape.field(segment).ok_or_else(|| unknown(segment))?;
        segments.push(def.name);
        kind = Some(def.kind);
    }

    let kind = kind.ok_or_else(|| unknown(path))?;
    trace!(entity = root.name, path, ?kind, "resolved property path");

    Ok(PropertyPath {
        path: path.to_string(),
        segments,
        kind,
    })
}
