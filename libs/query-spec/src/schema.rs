//! Static entity shapes: the field names and kinds the compiler resolves
//! paths against, plus the runtime accessor ([`Record`]) it reads values
//! through.

use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Declared field kind. Nullable fields use the kind of the wrapped value;
/// a null shows up as [`FieldValue::Null`] at read time.
#[derive(Clone, Copy)]
pub enum FieldKind {
    String,
    I64,
    U64,
    F64,
    Decimal,
    Bool,
    Uuid,
    DateTimeUtc,
    Date,
    Time,
    Enum(&'static EnumShape),
    /// Nested entity, navigable with dotted paths.
    Object(fn() -> &'static Shape),
}

impl FieldKind {
    pub fn is_string(&self) -> bool {
        matches!(self, FieldKind::String)
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, FieldKind::Enum(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, FieldKind::Object(_))
    }

    /// Kinds that take part in keyword search over all fields: strings,
    /// numbers, booleans and timestamps. Enumerations, nested objects,
    /// identifiers and bare dates or times only match when named
    /// explicitly.
    pub fn is_keyword_searchable(&self) -> bool {
        !matches!(
            self,
            FieldKind::Enum(_)
                | FieldKind::Object(_)
                | FieldKind::Uuid
                | FieldKind::Date
                | FieldKind::Time
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::I64 => "i64",
            FieldKind::U64 => "u64",
            FieldKind::F64 => "f64",
            FieldKind::Decimal => "decimal",
            FieldKind::Bool => "bool",
            FieldKind::Uuid => "uuid",
            FieldKind::DateTimeUtc => "datetime",
            FieldKind::Date => "date",
            FieldKind::Time => "time",
            FieldKind::Enum(e) => e.name,
            FieldKind::Object(s) => s().name,
        }
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Enum(e) => write!(f, "Enum({})", e.name),
            FieldKind::Object(s) => write!(f, "Object({})", s().name),
            other => f.write_str(other.name()),
        }
    }
}

/// Enumeration members and their discriminants, in declaration order.
#[derive(Debug)]
pub struct EnumShape {
    pub name: &'static str,
    pub members: &'static [(&'static str, i64)],
}

impl EnumShape {
    pub const fn new(name: &'static str, members: &'static [(&'static str, i64)]) -> Self {
        Self { name, members }
    }

    /// Member name (any case) or a defined discriminant.
    pub fn parse(&self, s: &str) -> Option<i64> {
        let s = s.trim();
        if let Some((_, d)) = self
            .members
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
        {
            return Some(*d);
        }
        let d = s.parse::<i64>().ok()?;
        self.members.iter().any(|(_, v)| *v == d).then_some(d)
    }

    pub fn name_of(&self, discriminant: i64) -> Option<&'static str> {
        self.members
            .iter()
            .find(|(_, d)| *d == discriminant)
            .map(|(name, _)| *name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDef {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// First-level fields of an entity type.
#[derive(Debug)]
pub struct Shape {
    pub name: &'static str,
    pub fields: &'static [FieldDef],
}

impl Shape {
    pub const fn new(name: &'static str, fields: &'static [FieldDef]) -> Self {
        Self { name, fields }
    }

    /// Case-insensitive member lookup.
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }
}

/// Value of one field on one record, borrowed where possible.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Null,
    String(&'a str),
    I64(i64),
    U64(u64),
    F64(f64),
    Decimal(&'a BigDecimal),
    Bool(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    Time(NaiveTime),
    Enum(i64),
    Object(&'a dyn Record),
}

impl<'a> FieldValue<'a> {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// String conversion used by keyword search. `None` for nulls and
    /// nested objects.
    pub fn to_text(&self, kind: FieldKind) -> Option<String> {
        Some(match self {
            FieldValue::Null | FieldValue::Object(_) => return None,
            FieldValue::String(s) => (*s).to_string(),
            FieldValue::I64(n) => n.to_string(),
            FieldValue::U64(n) => n.to_string(),
            FieldValue::F64(n) => n.to_string(),
            FieldValue::Decimal(d) => d.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Uuid(u) => u.hyphenated().to_string(),
            FieldValue::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            FieldValue::Date(d) => d.to_string(),
            FieldValue::Time(t) => t.to_string(),
            FieldValue::Enum(d) => match kind {
                FieldKind::Enum(shape) => shape
                    .name_of(*d)
                    .map(str::to_string)
                    .unwrap_or_else(|| d.to_string()),
                _ => d.to_string(),
            },
        })
    }
}

impl fmt::Debug for dyn Record + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Record")
    }
}

/// A Rust type usable as an entity field: its declared kind plus how to
/// read a value of it. `#[derive(Entity)]` builds shapes from this, and
/// `#[derive(QueryEnum)]` / `#[derive(Entity)]` implement it for enums and
/// nested entities.
pub trait QueryField {
    const KIND: FieldKind;

    fn query_value(&self) -> FieldValue<'_>;
}

impl QueryField for String {
    const KIND: FieldKind = FieldKind::String;

    fn query_value(&self) -> FieldValue<'_> {
        FieldValue::String(self.as_str())
    }
}

impl QueryField for BigDecimal {
    const KIND: FieldKind = FieldKind::Decimal;

    fn query_value(&self) -> FieldValue<'_> {
        FieldValue::Decimal(self)
    }
}

macro_rules! query_field_copy {
    ($($ty:ty => $kind:ident / $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl QueryField for $ty {
                const KIND: FieldKind = FieldKind::$kind;

                fn query_value(&self) -> FieldValue<'_> {
                    FieldValue::$variant(<$target>::from(*self))
                }
            }
        )*
    };
}

query_field_copy! {
    i8 => I64 / I64 as i64,
    i16 => I64 / I64 as i64,
    i32 => I64 / I64 as i64,
    i64 => I64 / I64 as i64,
    u8 => U64 / U64 as u64,
    u16 => U64 / U64 as u64,
    u32 => U64 / U64 as u64,
    u64 => U64 / U64 as u64,
    f32 => F64 / F64 as f64,
    f64 => F64 / F64 as f64,
    bool => Bool / Bool as bool,
    Uuid => Uuid / Uuid as Uuid,
    DateTime<Utc> => DateTimeUtc / DateTime as DateTime<Utc>,
    NaiveDate => Date / Date as NaiveDate,
    NaiveTime => Time / Time as NaiveTime,
}

/// `None` reads as [`FieldValue::Null`]; the kind is the wrapped one.
impl<T: QueryField> QueryField for Option<T> {
    const KIND: FieldKind = T::KIND;

    fn query_value(&self) -> FieldValue<'_> {
        self.as_ref().map_or(FieldValue::Null, T::query_value)
    }
}

/// Runtime accessor for an entity or nested object.
///
/// `name` is always the canonical field name from the [`Shape`]; unknown
/// names should return [`FieldValue::Null`].
pub trait Record {
    fn field(&self, name: &str) -> FieldValue<'_>;
}

/// A root type queries can be compiled for.
pub trait Entity: Record + Send + Sync + 'static {
    fn shape() -> &'static Shape;
}
