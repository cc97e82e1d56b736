//! User management handlers.
//!
//! Listing and manual creation are admin-only; everything addressed to a
//! specific account is owner-or-admin.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::SessionContext;
use crate::api::AppState;
use crate::config::is_valid_role;
use crate::domain::{require_owner_or_admin, require_role, UserResponse, UserRole};
use crate::errors::{AppError, AppResult};
use crate::types::{MessageResponse, NoContent};

/// Admin user creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "John Doe")]
    pub name: String,
    /// Role to assign (defaults to USER)
    #[schema(example = "USER")]
    pub role: Option<String>,
}

/// Profile update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
}

/// Password change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[schema(example = "OldPass123!")]
    pub current_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "NewPass456!", min_length = 8)]
    pub new_password: String,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/me", get(get_current_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/password", put(change_password))
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> AppResult<Json<Vec<UserResponse>>> {
    require_role(ctx.session(), UserRole::Admin).authorize()?;

    let users = state.user_service.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Create a user with an explicit role (admin only)
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    require_role(ctx.session(), UserRole::Admin).authorize()?;

    let role = match payload.role.as_deref() {
        None => UserRole::User,
        Some(role) if is_valid_role(role) => UserRole::from(role),
        Some(role) => {
            return Err(AppError::bad_request(format!("Unknown role: {}", role)));
        }
    };

    let user = state
        .user_service
        .create_user(payload.email, payload.password, payload.name, role)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Get the authenticated user's own account
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> AppResult<Json<UserResponse>> {
    require_role(ctx.session(), UserRole::User).authorize()?;
    let session = ctx.session().ok_or(AppError::Unauthorized)?;

    let user = state.user_service.get_user(session.subject_id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Get a user by ID (owner or admin)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 403, description = "Not the account owner"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> AppResult<Json<UserResponse>> {
    require_owner_or_admin(ctx.session(), id).authorize()?;

    let user = state.user_service.get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update profile fields (owner or admin)
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 403, description = "Not the account owner"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    require_owner_or_admin(ctx.session(), id).authorize()?;

    let user = state
        .user_service
        .update_profile(id, payload.name, payload.email)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

/// Change a user's password (owner or admin)
#[utoipa::path(
    put,
    path = "/users/{id}/password",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 401, description = "Current password incorrect"),
        (status = 403, description = "Not the account owner")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    require_owner_or_admin(ctx.session(), id).authorize()?;

    state
        .auth_service
        .change_password(id, payload.current_password, payload.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password updated")))
}

/// Delete a user (owner or admin)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Not the account owner"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    require_owner_or_admin(ctx.session(), id).authorize()?;

    state.user_service.delete_user(id).await?;
    Ok(NoContent)
}
