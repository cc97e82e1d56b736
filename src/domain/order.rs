//! Order domain entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// Placed order
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    #[schema(value_type = String, example = "57.49")]
    pub total: Decimal,
    #[schema(example = "PENDING")]
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Minimal user summary attached to admin order listings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderUser {
    pub id: i32,
    pub email: String,
    pub name: String,
}

/// An order with its owner's summary (admin listing shape).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderWithUser {
    #[serde(flatten)]
    pub order: Order,
    pub user: Option<OrderUser>,
}
