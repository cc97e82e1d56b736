//! Order handlers.
//!
//! Admins see every order with its owner summary; other callers only their
//! own, gated by the ownership policy.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json, Response},
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::middleware::SessionContext;
use crate::api::AppState;
use crate::domain::{require_owner_or_admin, require_role, UserRole};
use crate::errors::AppResult;

/// Order list selector
#[derive(Debug, Deserialize, IntoParams)]
pub struct OrdersQuery {
    /// Owner of the orders
    pub user_id: i32,
}

/// Create order routes
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/", get(list_orders))
}

/// List orders: all of them for admins, otherwise the caller's own
#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(OrdersQuery),
    responses(
        (status = 200, description = "Orders"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the order owner")
    )
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<OrdersQuery>,
) -> AppResult<Response> {
    // Admins get the full listing with user summaries
    if require_role(ctx.session(), UserRole::Admin).permitted {
        let orders = state.order_service.list_all_orders().await?;
        return Ok(Json(orders).into_response());
    }

    require_owner_or_admin(ctx.session(), query.user_id).authorize()?;

    let orders = state.order_service.list_orders_for_user(query.user_id).await?;
    Ok(Json(orders).into_response())
}
