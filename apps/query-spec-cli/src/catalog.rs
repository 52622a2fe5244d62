//! Demo catalog entity the CLI runs requests against.

use chrono::{DateTime, Utc};
use query_spec::{Entity, QueryEnum};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, QueryEnum)]
pub enum Status {
    Draft = 0,
    Active = 1,
    Discontinued = 2,
}

#[derive(Debug, Clone, Serialize, Deserialize, Entity)]
#[serde(rename_all = "camelCase")]
#[query(rename_all = "camelCase")]
pub struct Brand {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Entity)]
#[serde(rename_all = "camelCase")]
#[query(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub brand: Option<Brand>,
}
