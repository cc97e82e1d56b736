//! Category handlers.
//!
//! Reads are public; mutations are admin-only.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::SessionContext;
use crate::api::AppState;
use crate::domain::{require_role, Category, UserRole};
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

/// Category creation / rename request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Kitchen Tools")]
    pub name: String,
}

/// Create category routes
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/slug/:slug", get(get_category_by_slug))
}

/// List all categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    responses((status = 200, description = "All categories", body = [Category]))
)]
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let categories = state.category_service.list_categories().await?;
    Ok(Json(categories))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Category>> {
    let category = state.category_service.get_category(id).await?;
    Ok(Json(category))
}

/// Get a category by slug
#[utoipa::path(
    get,
    path = "/categories/slug/{slug}",
    tag = "Categories",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Category>> {
    let category = state.category_service.get_category_by_slug(&slug).await?;
    Ok(Json(category))
}

/// Create a category (admin only)
#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    security(("bearer_auth" = [])),
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Category already exists")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<Created<Category>> {
    require_role(ctx.session(), UserRole::Admin).authorize()?;

    let category = state.category_service.create_category(payload.name).await?;
    Ok(Created(category))
}

/// Rename a category (admin only)
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<Json<Category>> {
    require_role(ctx.session(), UserRole::Admin).authorize()?;

    let category = state
        .category_service
        .update_category(id, payload.name)
        .await?;
    Ok(Json(category))
}

/// Delete a category (admin only)
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    require_role(ctx.session(), UserRole::Admin).authorize()?;

    state.category_service.delete_category(id).await?;
    Ok(NoContent)
}
