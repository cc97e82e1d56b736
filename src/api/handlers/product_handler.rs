//! Product handlers.
//!
//! Reads are public; mutations are admin-only.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::SessionContext;
use crate::api::AppState;
use crate::domain::{require_role, NewProduct, Product, ProductChanges, UserRole};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, NoContent};

/// Product list filters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductListQuery {
    /// Restrict to one category
    pub category_id: Option<i32>,
}

/// Product creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Cast Iron Skillet")]
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "29.90")]
    pub price: Decimal,
    #[schema(example = 12)]
    pub stock: i32,
    #[validate(length(min = 1, message = "Reference is required"))]
    #[schema(example = "PROD-001-SKL")]
    pub reference: String,
    pub images: Option<Vec<String>>,
    pub category_id: Option<i32>,
}

/// Product update request (absent fields stay unchanged)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    #[validate(length(min = 1, message = "Reference is required"))]
    pub reference: Option<String>,
    pub images: Option<Vec<String>>,
    pub category_id: Option<i32>,
}

fn images_json(images: Vec<String>) -> serde_json::Value {
    serde_json::Value::from(images)
}

/// Create product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/reference/:reference", get(get_product_by_reference))
}

/// List products
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    params(ProductListQuery),
    responses((status = 200, description = "Products"))
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = state.product_service.list_products(query.category_id).await?;
    Ok(Json(ApiResponse::success(products)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Product>> {
    let product = state.product_service.get_product(id).await?;
    Ok(Json(product))
}

/// Get a product by its unique reference
#[utoipa::path(
    get,
    path = "/products/reference/{reference}",
    tag = "Products",
    params(("reference" = String, Path, description = "Merchant reference")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product_by_reference(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> AppResult<Json<Product>> {
    let product = state
        .product_service
        .get_product_by_reference(&reference)
        .await?;
    Ok(Json(product))
}

/// Create a product (admin only)
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Reference already used")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<Created<Product>> {
    require_role(ctx.session(), UserRole::Admin).authorize()?;

    let product = state
        .product_service
        .create_product(NewProduct {
            name: payload.name,
            description: payload.description,
            price: payload.price,
            stock: payload.stock,
            reference: payload.reference,
            images: payload.images.map(images_json),
            category_id: payload.category_id,
        })
        .await?;

    Ok(Created(product))
}

/// Update a product (admin only)
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Reference already used")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    require_role(ctx.session(), UserRole::Admin).authorize()?;

    let product = state
        .product_service
        .update_product(
            id,
            ProductChanges {
                name: payload.name,
                description: payload.description.map(Some),
                price: payload.price,
                stock: payload.stock,
                reference: payload.reference,
                images: payload.images.map(|v| Some(images_json(v))),
                category_id: payload.category_id.map(Some),
            },
        )
        .await?;

    Ok(Json(product))
}

/// Delete a product (admin only)
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    require_role(ctx.session(), UserRole::Admin).authorize()?;

    state.product_service.delete_product(id).await?;
    Ok(NoContent)
}
