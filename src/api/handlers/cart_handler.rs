//! Cart handlers.
//!
//! Every cart endpoint targets an explicit user's cart and is gated by the
//! owner-or-admin policy.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{delete, get, patch, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::SessionContext;
use crate::api::AppState;
use crate::config::DEFAULT_CART_QUANTITY;
use crate::domain::{require_owner_or_admin, CartContents};
use crate::errors::AppResult;
use crate::types::MessageResponse;

/// Cart owner selector
#[derive(Debug, Deserialize, IntoParams)]
pub struct CartQuery {
    /// Owner of the cart
    pub user_id: i32,
}

/// Add-to-cart request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddItemRequest {
    pub user_id: i32,
    pub product_id: i32,
    /// Quantity to add (defaults to 1)
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[schema(example = 1)]
    pub quantity: Option<i32>,
}

/// Quantity update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateItemRequest {
    pub user_id: i32,
    pub product_id: i32,
    /// New quantity; zero or less removes the line
    #[schema(example = 3)]
    pub quantity: i32,
}

/// Line removal request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RemoveItemRequest {
    pub user_id: i32,
    pub product_id: i32,
}

/// Clear / close cart request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CartOwnerRequest {
    pub user_id: i32,
}

/// Create cart routes
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart).delete(clear_cart))
        .route(
            "/items",
            post(add_item).patch(update_item).delete(remove_item),
        )
        .route("/close", delete(close_cart))
}

/// Get the user's active cart with its items
#[utoipa::path(
    get,
    path = "/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(CartQuery),
    responses(
        (status = 200, description = "Active cart", body = CartContents),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the cart owner"),
        (status = 404, description = "No active cart")
    )
)]
pub async fn get_cart(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<CartQuery>,
) -> AppResult<Json<CartContents>> {
    require_owner_or_admin(ctx.session(), query.user_id).authorize()?;

    let cart = state.cart_service.get_cart(query.user_id).await?;
    Ok(Json(cart))
}

/// Add a product to the cart
#[utoipa::path(
    post,
    path = "/cart/items",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Product added", body = MessageResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the cart owner"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn add_item(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    ValidatedJson(payload): ValidatedJson<AddItemRequest>,
) -> AppResult<Json<MessageResponse>> {
    require_owner_or_admin(ctx.session(), payload.user_id).authorize()?;

    state
        .cart_service
        .add_item(
            payload.user_id,
            payload.product_id,
            payload.quantity.unwrap_or(DEFAULT_CART_QUANTITY),
        )
        .await?;

    Ok(Json(MessageResponse::new("Product added to cart")))
}

/// Overwrite a line's quantity (zero or less removes it)
#[utoipa::path(
    patch,
    path = "/cart/items",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Quantity updated", body = MessageResponse),
        (status = 403, description = "Not the cart owner"),
        (status = 404, description = "No active cart or no such line")
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    ValidatedJson(payload): ValidatedJson<UpdateItemRequest>,
) -> AppResult<Json<MessageResponse>> {
    require_owner_or_admin(ctx.session(), payload.user_id).authorize()?;

    state
        .cart_service
        .set_quantity(payload.user_id, payload.product_id, payload.quantity)
        .await?;

    Ok(Json(MessageResponse::new("Cart updated")))
}

/// Remove a product from the cart (idempotent)
#[utoipa::path(
    delete,
    path = "/cart/items",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = RemoveItemRequest,
    responses(
        (status = 200, description = "Product removed", body = MessageResponse),
        (status = 403, description = "Not the cart owner"),
        (status = 404, description = "No active cart")
    )
)]
pub async fn remove_item(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    ValidatedJson(payload): ValidatedJson<RemoveItemRequest>,
) -> AppResult<Json<MessageResponse>> {
    require_owner_or_admin(ctx.session(), payload.user_id).authorize()?;

    state
        .cart_service
        .remove_item(payload.user_id, payload.product_id)
        .await?;

    Ok(Json(MessageResponse::new("Product removed from cart")))
}

/// Remove all lines, keeping the cart active with a zero total
#[utoipa::path(
    delete,
    path = "/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = CartOwnerRequest,
    responses(
        (status = 200, description = "Cart cleared", body = MessageResponse),
        (status = 403, description = "Not the cart owner"),
        (status = 404, description = "No active cart")
    )
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    ValidatedJson(payload): ValidatedJson<CartOwnerRequest>,
) -> AppResult<Json<MessageResponse>> {
    require_owner_or_admin(ctx.session(), payload.user_id).authorize()?;

    state.cart_service.clear(payload.user_id).await?;
    Ok(Json(MessageResponse::new("Cart cleared")))
}

/// Delete the cart row outright
#[utoipa::path(
    delete,
    path = "/cart/close",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = CartOwnerRequest,
    responses(
        (status = 200, description = "Cart closed", body = MessageResponse),
        (status = 403, description = "Not the cart owner"),
        (status = 404, description = "No active cart")
    )
)]
pub async fn close_cart(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    ValidatedJson(payload): ValidatedJson<CartOwnerRequest>,
) -> AppResult<Json<MessageResponse>> {
    require_owner_or_admin(ctx.session(), payload.user_id).authorize()?;

    state.cart_service.close(payload.user_id).await?;
    Ok(Json(MessageResponse::new("Cart closed")))
}
