#![allow(dead_code)]
use bigdecimal::BigDecimal;
use chrono::{DateTime, TimeZone, Utc};
use query_spec::{Entity, QueryEnum};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, QueryEnum)]
pub enum Status {
    Draft = 0,
    Active = 1,
    Discontinued = 2,
}

#[derive(Debug, Clone, PartialEq, Entity)]
pub struct Brand {
    pub name: String,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Entity)]
#[query(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub stock: i32,
    pub rating: f64,
    pub active: bool,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub brand: Option<Brand>,
    #[query(skip)]
    pub internal_note: String,
}

pub fn product(name: &str, price: i64) -> Product {
    Product {
        id: Uuid::nil(),
        name: name.to_string(),
        description: None,
        price: BigDecimal::from(price),
        stock: 0,
        rating: 0.0,
        active: true,
        status: Status::Active,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        brand: None,
        internal_note: String::new(),
    }
}

pub fn with_brand(mut p: Product, brand: &str) -> Product {
    p.brand = Some(Brand {
        name: brand.to_string(),
        country: None,
    });
    p
}

/// Small catalog with every field kind populated somewhere.
pub fn catalog() -> Vec<Product> {
    let mut widget = with_brand(product("Widget", 20), "Acme Corp");
    widget.id = Uuid::from_u128(1);
    widget.description = Some("A blue widget".to_string());
    widget.stock = 5;
    widget.rating = 4.5;
    widget.created_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

    let mut gadget = with_brand(product("Gadget", 35), "Globex");
    gadget.id = Uuid::from_u128(2);
    gadget.stock = 0;
    gadget.rating = 3.0;
    gadget.status = Status::Discontinued;
    gadget.active = false;
    gadget.created_at = Utc.with_ymd_and_hms(2023, 6, 15, 8, 30, 0).unwrap();

    let mut gizmo = product("Gizmo", 10);
    gizmo.id = Uuid::from_u128(3);
    gizmo.description = Some("Widget accessory".to_string());
    gizmo.stock = 42;
    gizmo.rating = 4.9;
    gizmo.status = Status::Draft;
    gizmo.created_at = Utc.with_ymd_and_hms(2024, 5, 20, 0, 0, 0).unwrap();

    vec![widget, gadget, gizmo]
}

pub fn names<'a>(items: impl IntoIterator<Item = &'a Product>) -> Vec<&'a str> {
    items.into_iter().map(|p| p.name.as_str()).collect()
}
