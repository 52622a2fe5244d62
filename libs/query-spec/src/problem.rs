use http::StatusCode;
use query_spec_core::Error;
use serde::{Deserialize, Serialize};

/// RFC 9457 Problem Details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub type_url: String,
    /// A short, human-readable summary of the problem type.
    pub title: String,
    pub status: u16,
    /// Explanation specific to this occurrence.
    pub detail: String,
    /// Identifies the specific occurrence of the problem.
    pub instance: String,
    /// Machine-readable error code.
    pub code: String,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_string(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
        }
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = type_url.into();
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }
}

/// Map a compile error to a 400 Problem carrying its stable code.
pub fn spec_error_to_problem(e: &Error, instance: &str) -> Problem {
    let title = match e {
        Error::MissingField
        | Error::MissingOperator
        | Error::MissingLogic
        | Error::MissingFilters
        | Error::EmptyFilters(_) => "Filter error",
        Error::UnknownMember { .. } => "Unknown member",
        Error::UnsupportedOperator(_) | Error::OperatorNotApplicable { .. } => {
            "Unsupported operator"
        }
        Error::UnsupportedLogic(_) => "Unsupported logic",
        Error::InvalidValue { .. } => "Invalid value",
        Error::NotComparable(_) => "Not comparable",
        Error::NotSearchable(_) => "Not searchable",
    };
    let code = e.code();
    Problem::new(StatusCode::BAD_REQUEST, title, e.to_string())
        .with_type(format!("https://errors.example.com/{code}"))
        .with_code(code)
        .with_instance(instance)
}
