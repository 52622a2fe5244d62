//! Declarative query model: filter AST, search/order/page specs and the
//! wire DTOs they are validated from. Nothing here knows about entities;
//! compilation lives in the `query-spec` crate.

pub mod ast {
    use std::fmt;
    use std::str::FromStr;

    use serde::{Deserialize, Serialize};

    use crate::Error;

    /// Validated filter tree. Built from [`crate::FilterRequest::validate`].
    #[derive(Clone, Debug, PartialEq)]
    pub enum FilterNode {
        Leaf {
            field: String,
            operator: Op,
            value: RawValue,
        },
        Composite {
            logic: Logic,
            children: Vec<FilterNode>,
        },
    }

    impl FilterNode {
        pub fn leaf(field: impl Into<String>, operator: Op, value: impl Into<RawValue>) -> Self {
            FilterNode::Leaf {
                field: field.into(),
                operator,
                value: value.into(),
            }
        }

        pub fn composite(logic: Logic, children: Vec<FilterNode>) -> Self {
            FilterNode::Composite { logic, children }
        }

        /// Number of nodes in the tree, the root included.
        pub fn node_count(&self) -> usize {
            match self {
                FilterNode::Leaf { .. } => 1,
                FilterNode::Composite { children, .. } => {
                    1 + children.iter().map(FilterNode::node_count).sum::<usize>()
                }
            }
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum Op {
        Eq,
        Neq,
        Lt,
        Lte,
        Gt,
        Gte,
        Contains,
        StartsWith,
        EndsWith,
    }

    impl Op {
        pub fn as_str(&self) -> &'static str {
            match self {
                Op::Eq => "eq",
                Op::Neq => "neq",
                Op::Lt => "lt",
                Op::Lte => "lte",
                Op::Gt => "gt",
                Op::Gte => "gte",
                Op::Contains => "contains",
                Op::StartsWith => "startswith",
                Op::EndsWith => "endswith",
            }
        }

        /// Substring operators only apply to string leaves.
        pub fn is_string_only(&self) -> bool {
            matches!(self, Op::Contains | Op::StartsWith | Op::EndsWith)
        }
    }

    impl FromStr for Op {
        type Err = Error;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Ok(match s.trim().to_ascii_lowercase().as_str() {
                "eq" => Op::Eq,
                "neq" => Op::Neq,
                "lt" => Op::Lt,
                "lte" => Op::Lte,
                "gt" => Op::Gt,
                "gte" => Op::Gte,
                "contains" => Op::Contains,
                "startswith" => Op::StartsWith,
                "endswith" => Op::EndsWith,
                _ => return Err(Error::UnsupportedOperator(s.to_string())),
            })
        }
    }

    impl fmt::Display for Op {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum Logic {
        And,
        Or,
        Xor,
    }

    impl Logic {
        pub fn as_str(&self) -> &'static str {
            match self {
                Logic::And => "and",
                Logic::Or => "or",
                Logic::Xor => "xor",
            }
        }

        #[inline]
        pub fn combine(&self, a: bool, b: bool) -> bool {
            match self {
                Logic::And => a && b,
                Logic::Or => a || b,
                Logic::Xor => a ^ b,
            }
        }
    }

    impl FromStr for Logic {
        type Err = Error;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Ok(match s.trim().to_ascii_lowercase().as_str() {
                "and" => Logic::And,
                "or" => Logic::Or,
                "xor" => Logic::Xor,
                _ => return Err(Error::UnsupportedLogic(s.to_string())),
            })
        }
    }

    impl fmt::Display for Logic {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    /// Untyped filter operand exactly as received. Coercion to the target
    /// field type happens at compile time.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(from = "serde_json::Value", into = "serde_json::Value")]
    pub enum RawValue {
        Null,
        Bool(bool),
        Number(serde_json::Number),
        String(String),
        /// Structured JSON (object or array).
        Token(serde_json::Value),
    }

    impl RawValue {
        pub fn is_null(&self) -> bool {
            matches!(self, RawValue::Null)
        }

        /// Textual form used by the string and generic conversions.
        /// Structured tokens have none.
        pub fn as_text(&self) -> Option<String> {
            match self {
                RawValue::Null => None,
                RawValue::Bool(b) => Some(b.to_string()),
                RawValue::Number(n) => Some(n.to_string()),
                RawValue::String(s) => Some(s.clone()),
                RawValue::Token(_) => None,
            }
        }
    }

    impl fmt::Display for RawValue {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                RawValue::Null => f.write_str("null"),
                RawValue::Bool(b) => write!(f, "{}", b),
                RawValue::Number(n) => write!(f, "{}", n),
                RawValue::String(s) => f.write_str(s),
                RawValue::Token(v) => write!(f, "{}", v),
            }
        }
    }

    impl From<serde_json::Value> for RawValue {
        fn from(v: serde_json::Value) -> Self {
            use serde_json::Value as J;
            match v {
                J::Null => RawValue::Null,
                J::Bool(b) => RawValue::Bool(b),
                J::Number(n) => RawValue::Number(n),
                J::String(s) => RawValue::String(s),
                other @ (J::Array(_) | J::Object(_)) => RawValue::Token(other),
            }
        }
    }

    impl From<RawValue> for serde_json::Value {
        fn from(v: RawValue) -> Self {
            use serde_json::Value as J;
            match v {
                RawValue::Null => J::Null,
                RawValue::Bool(b) => J::Bool(b),
                RawValue::Number(n) => J::Number(n),
                RawValue::String(s) => J::String(s),
                RawValue::Token(t) => t,
            }
        }
    }

    impl From<&str> for RawValue {
        fn from(s: &str) -> Self {
            RawValue::String(s.to_string())
        }
    }

    impl From<String> for RawValue {
        fn from(s: String) -> Self {
            RawValue::String(s)
        }
    }

    impl From<bool> for RawValue {
        fn from(b: bool) -> Self {
            RawValue::Bool(b)
        }
    }

    impl From<i64> for RawValue {
        fn from(n: i64) -> Self {
            RawValue::Number(n.into())
        }
    }

    /// Non-finite floats have no JSON form and stay textual, so numeric
    /// coercion rejects them.
    impl From<f64> for RawValue {
        fn from(n: f64) -> Self {
            serde_json::Number::from_f64(n)
                .map(RawValue::Number)
                .unwrap_or_else(|| RawValue::String(n.to_string()))
        }
    }
}

mod page;
mod request;

pub use page::{Page, PageInfo};
pub use request::{BaseFilter, FilterRequest, PaginationFilter, SearchRequest};

use std::fmt;

/// Keyword search over explicit fields, or over every eligible first-level
/// field when `fields` is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchSpec {
    pub fields: Vec<String>,
    pub keyword: Option<String>,
}

impl SearchSpec {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            fields: Vec::new(),
            keyword: Some(keyword.into()),
        }
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Keyword if present and not blank.
    pub fn effective_keyword(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|k| !k.is_empty())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}


#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderKey {
    pub field: String,
    pub dir: SortDir,
}

/// Ordered sort keys; the first one is primary, the rest break ties.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderBy(pub Vec<OrderKey>);

impl OrderBy {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse tokens like `"price desc"` or `"name"`.
    /// A second word starting with `desc` (any case) means descending,
    /// anything else ascending. Blank tokens are skipped.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = tokens
            .into_iter()
            .filter_map(|raw| {
                let mut parts = raw.as_ref().split_whitespace();
                let field = parts.next()?;
                let dir = match parts.next() {
                    Some(hint) if hint.to_ascii_lowercase().starts_with("desc") => SortDir::Desc,
                    _ => SortDir::Asc,
                };
                Some(OrderKey {
                    field: field.to_string(),
                    dir,
                })
            })
            .collect();
        Self(keys)
    }

    pub fn then(mut self, field: impl Into<String>, dir: SortDir) -> Self {
        self.0.push(OrderKey {
            field: field.into(),
            dir,
        });
        self
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(none)");
        }
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|key| {
                let dir = match key.dir {
                    SortDir::Asc => "asc",
                    SortDir::Desc => "desc",
                };
                format!("{} {}", key.field, dir)
            })
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

pub const DEFAULT_PAGE_NUMBER: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Requested page, as received. Use [`PageSpec::normalize`] before use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageSpec {
    pub page_number: i64,
    pub page_size: i64,
}

/// Normalised skip/take bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageBounds {
    pub page_number: u64,
    pub page_size: u64,
    pub skip: Option<u64>,
    pub take: u64,
}

impl PageSpec {
    pub fn new(page_number: i64, page_size: i64) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// Apply defaults with the standard page size of 10.
    pub fn normalize(&self) -> PageBounds {
        self.normalize_with(DEFAULT_PAGE_SIZE as u64, None)
    }

    /// Non-positive numbers fall back to page 1 / `default_size`.
    /// Skip is only set past the first page.
    pub fn normalize_with(&self, default_size: u64, max_size: Option<u64>) -> PageBounds {
        let page_number = if self.page_number <= 0 {
            DEFAULT_PAGE_NUMBER as u64
        } else {
            self.page_number as u64
        };
        let mut page_size = if self.page_size <= 0 {
            default_size.max(1)
        } else {
            self.page_size as u64
        };
        if let Some(max) = max_size {
            page_size = page_size.min(max.max(1));
        }
        let skip = (page_number > 1).then(|| (page_number - 1).saturating_mul(page_size));
        PageBounds {
            page_number,
            page_size,
            skip,
            take: page_size,
        }
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE)
    }
}

/// Every way a request can fail to compile. All of these are client input
/// errors and are raised before anything executes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("filter field is required when no logic is declared")]
    MissingField,

    #[error("filter operator is required when no logic is declared")]
    MissingOperator,

    #[error("filter logic is required when child filters are declared")]
    MissingLogic,

    #[error("filters are required when a logic is declared")]
    MissingFilters,

    #[error("logic '{0}' declared without any child filter")]
    EmptyFilters(String),

    #[error("unknown member '{member}' in path '{path}'")]
    UnknownMember { path: String, member: String },

    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("unsupported operator: '{operator}' cannot be applied to non-string field '{field}'")]
    OperatorNotApplicable { operator: String, field: String },

    #[error("unsupported logic: {0}")]
    UnsupportedLogic(String),

    #[error("value {value} is not valid for {field}")]
    InvalidValue { value: String, field: String },

    #[error("field '{0}' is not comparable")]
    NotComparable(String),

    #[error("field '{0}' is not searchable")]
    NotSearchable(String),
}

impl Error {
    pub fn invalid_value(value: impl fmt::Display, field: impl Into<String>) -> Self {
        Error::InvalidValue {
            value: value.to_string(),
            field: field.into(),
        }
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Error::MissingField => "FILTER_MISSING_FIELD",
            Error::MissingOperator => "FILTER_MISSING_OPERATOR",
            Error::MissingLogic => "FILTER_MISSING_LOGIC",
            Error::MissingFilters => "FILTER_MISSING_FILTERS",
            Error::EmptyFilters(_) => "FILTER_EMPTY_FILTERS",
            Error::UnknownMember { .. } => "UNKNOWN_MEMBER",
            Error::UnsupportedOperator(_) | Error::OperatorNotApplicable { .. } => {
                "UNSUPPORTED_OPERATOR"
            }
            Error::UnsupportedLogic(_) => "UNSUPPORTED_LOGIC",
            Error::InvalidValue { .. } => "INVALID_VALUE",
            Error::NotComparable(_) => "NOT_COMPARABLE",
            Error::NotSearchable(_) => "NOT_SEARCHABLE",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
