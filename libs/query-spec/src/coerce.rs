//! Raw value → typed operand coercion, keyed on the resolved field kind.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use query_spec_core::ast::RawValue;
use query_spec_core::{Error, Result};
use uuid::Uuid;

use crate::schema::{FieldKind, FieldValue};

/// Typed comparison constant produced from a [`RawValue`].
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Null,
    String(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Decimal(BigDecimal),
    Bool(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    Time(NaiveTime),
    Enum(i64),
}

impl Operand {
    pub fn is_null(&self) -> bool {
        matches!(self, Operand::Null)
    }

    /// Borrowed view, so operands and record values share one comparison.
    pub fn as_value(&self) -> FieldValue<'_> {
        match self {
            Operand::Null => FieldValue::Null,
            Operand::String(s) => FieldValue::String(s),
            Operand::I64(n) => FieldValue::I64(*n),
            Operand::U64(n) => FieldValue::U64(*n),
            Operand::F64(n) => FieldValue::F64(*n),
            Operand::Decimal(d) => FieldValue::Decimal(d),
            Operand::Bool(b) => FieldValue::Bool(*b),
            Operand::Uuid(u) => FieldValue::Uuid(*u),
            Operand::DateTime(dt) => FieldValue::DateTime(*dt),
            Operand::Date(d) => FieldValue::Date(*d),
            Operand::Time(t) => FieldValue::Time(*t),
            Operand::Enum(d) => FieldValue::Enum(*d),
        }
    }
}

/// Coerce `raw` into an operand of `kind`. `field` only feeds the error.
///
/// Enumerations and identifiers are matched before the generic textual
/// conversion; strings pass through untouched.
pub fn coerce(kind: FieldKind, field: &str, raw: &RawValue) -> Result<Operand> {
    if raw.is_null() {
        return Ok(Operand::Null);
    }
    let invalid = || Error::invalid_value(raw, field);

    match kind {
        FieldKind::Enum(shape) => {
            let text = raw.as_text().ok_or_else(invalid)?;
            shape.parse(&text).map(Operand::Enum).ok_or_else(invalid)
        }
        FieldKind::Uuid => {
            let text = raw.as_text().ok_or_else(invalid)?;
            Uuid::parse_str(text.trim())
                .map(Operand::Uuid)
                .map_err(|_| invalid())
        }
        FieldKind::String => match raw {
            RawValue::String(s) => Ok(Operand::String(s.clone())),
            other => other.as_text().map(Operand::String).ok_or_else(invalid),
        },
        FieldKind::DateTimeUtc => {
            let text = raw.as_text().ok_or_else(invalid)?;
            parse_datetime(&text)
                .map(Operand::DateTime)
                .ok_or_else(invalid)
        }
        FieldKind::Date => {
            let text = raw.as_text().ok_or_else(invalid)?;
            parse_date(&text).map(Operand::Date).ok_or_else(invalid)
        }
        FieldKind::Time => {
            let text = raw.as_text().ok_or_else(invalid)?;
            parse_time(&text).map(Operand::Time).ok_or_else(invalid)
        }
        FieldKind::I64 => change_type::<i64>(raw).map(Operand::I64).ok_or_else(invalid),
        FieldKind::U64 => change_type::<u64>(raw).map(Operand::U64).ok_or_else(invalid),
        FieldKind::F64 => change_type::<f64>(raw)
            .filter(|f| f.is_finite())
            .map(Operand::F64)
            .ok_or_else(invalid),
        FieldKind::Decimal => change_type::<BigDecimal>(raw)
            .map(Operand::Decimal)
            .ok_or_else(invalid),
        FieldKind::Bool => match raw {
            RawValue::Bool(b) => Ok(Operand::Bool(*b)),
            RawValue::String(s) => parse_bool(s).map(Operand::Bool).ok_or_else(invalid),
            _ => Err(invalid()),
        },
        FieldKind::Object(_) => Err(invalid()),
    }
}

/// Generic conversion from the raw textual form (JSON number or numeric
/// string). Booleans and structured tokens never convert to numbers.
fn change_type<N: FromStr>(raw: &RawValue) -> Option<N> {
    match raw {
        RawValue::Number(n) => n.to_string().parse().ok(),
        RawValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// RFC 3339, a naive date-time taken as UTC, or a bare date at midnight UTC.
pub(crate) fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(s).map(|dt| dt.date_naive()))
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}
