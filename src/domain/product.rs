//! Product domain entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// Catalog product
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Product {
    pub id: i32,
    #[schema(example = "Cast Iron Skillet")]
    pub name: String,
    pub description: Option<String>,
    /// Live catalog price; cart lines keep their own snapshot of it
    #[schema(value_type = String, example = "29.90")]
    pub price: Decimal,
    #[schema(example = 12)]
    pub stock: i32,
    /// Unique merchant reference
    #[schema(example = "PROD-001-SKL")]
    pub reference: String,
    /// JSON array of image URLs
    #[schema(value_type = Option<Vec<String>>)]
    pub images: Option<serde_json::Value>,
    pub category_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub reference: String,
    pub images: Option<serde_json::Value>,
    pub category_id: Option<i32>,
}

/// Field changes applied to an existing product (None = unchanged).
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub reference: Option<String>,
    pub images: Option<Option<serde_json::Value>>,
    pub category_id: Option<Option<i32>>,
}
