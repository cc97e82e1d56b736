//! Integration tests for API endpoints.
//!
//! These tests use mock services to exercise routing, session extraction
//! and the access policy end to end, without a database. Two canned tokens
//! stand in for real credentials: `user-token` (subject 1, USER) and
//! `admin-token` (subject 9, ADMIN).

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tower::ServiceExt;

use storefront_api::api::{create_router, AppState};
use storefront_api::domain::{
    Cart, CartContents, Category, NewProduct, Order, OrderWithUser, Product, ProductChanges,
    Session, User, UserRole,
};
use storefront_api::errors::{AppError, AppResult};
use storefront_api::infra::Database;
use storefront_api::services::{
    AuthService, CartService, CategoryService, OrderService, ProductService, TokenResponse,
    UserService,
};

// =============================================================================
// Mock services
// =============================================================================

fn test_user(id: i32, role: UserRole) -> User {
    User {
        id,
        email: format!("user{}@example.com", id),
        password_hash: "hashed".to_string(),
        name: format!("User {}", id),
        role,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn test_session(subject_id: i32, role: UserRole) -> Session {
    let now = Utc::now();
    Session {
        subject_id,
        role,
        name: format!("User {}", subject_id),
        email: format!("user{}@example.com", subject_id),
        issued_at: now,
        expires_at: now + chrono::Duration::hours(1),
    }
}

fn test_product(id: i32) -> Product {
    Product {
        id,
        name: "Cast Iron Skillet".to_string(),
        description: None,
        price: dec!(29.90),
        stock: 12,
        reference: format!("PROD-{:03}", id),
        images: None,
        category_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

struct MockAuthService;

#[async_trait]
impl AuthService for MockAuthService {
    async fn register(&self, email: String, _password: String, name: String) -> AppResult<User> {
        let mut user = test_user(1, UserRole::User);
        user.email = email;
        user.name = name;
        Ok(user)
    }

    async fn login(&self, _email: String, _password: String) -> AppResult<TokenResponse> {
        Ok(TokenResponse {
            access_token: "user-token".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 604800,
        })
    }

    async fn change_password(
        &self,
        _user_id: i32,
        _current_password: String,
        _new_password: String,
    ) -> AppResult<()> {
        Ok(())
    }

    fn verify_token(&self, token: &str) -> AppResult<Session> {
        match token {
            "user-token" => Ok(test_session(1, UserRole::User)),
            "admin-token" => Ok(test_session(9, UserRole::Admin)),
            _ => Err(AppError::Unauthorized),
        }
    }
}

struct MockUserService;

#[async_trait]
impl UserService for MockUserService {
    async fn get_user(&self, id: i32) -> AppResult<User> {
        Ok(test_user(id, UserRole::User))
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(vec![
            test_user(1, UserRole::User),
            test_user(9, UserRole::Admin),
        ])
    }

    async fn create_user(
        &self,
        email: String,
        _password: String,
        name: String,
        role: UserRole,
    ) -> AppResult<User> {
        let mut user = test_user(2, role);
        user.email = email;
        user.name = name;
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: i32,
        name: Option<String>,
        email: Option<String>,
    ) -> AppResult<User> {
        let mut user = test_user(id, UserRole::User);
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }
        Ok(user)
    }

    async fn delete_user(&self, _id: i32) -> AppResult<()> {
        Ok(())
    }
}

struct MockCategoryService;

#[async_trait]
impl CategoryService for MockCategoryService {
    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        Ok(vec![])
    }

    async fn get_category(&self, id: i32) -> AppResult<Category> {
        Ok(Category {
            id,
            name: "Kitchen Tools".to_string(),
            slug: "kitchen-tools".to_string(),
            reference: "kitchen-tools".to_string(),
        })
    }

    async fn get_category_by_slug(&self, _slug: &str) -> AppResult<Category> {
        self.get_category(1).await
    }

    async fn create_category(&self, name: String) -> AppResult<Category> {
        Ok(Category {
            id: 1,
            slug: name.to_lowercase(),
            reference: name.to_lowercase(),
            name,
        })
    }

    async fn update_category(&self, id: i32, name: String) -> AppResult<Category> {
        Ok(Category {
            id,
            slug: name.to_lowercase(),
            reference: name.to_lowercase(),
            name,
        })
    }

    async fn delete_category(&self, _id: i32) -> AppResult<()> {
        Ok(())
    }
}

struct MockProductService;

#[async_trait]
impl ProductService for MockProductService {
    async fn list_products(&self, _category_id: Option<i32>) -> AppResult<Vec<Product>> {
        Ok(vec![test_product(1)])
    }

    async fn get_product(&self, id: i32) -> AppResult<Product> {
        Ok(test_product(id))
    }

    async fn get_product_by_reference(&self, _reference: &str) -> AppResult<Product> {
        Ok(test_product(1))
    }

    async fn create_product(&self, _data: NewProduct) -> AppResult<Product> {
        Ok(test_product(1))
    }

    async fn update_product(&self, id: i32, _changes: ProductChanges) -> AppResult<Product> {
        Ok(test_product(id))
    }

    async fn delete_product(&self, _id: i32) -> AppResult<()> {
        Ok(())
    }
}

struct MockCartService;

#[async_trait]
impl CartService for MockCartService {
    async fn get_cart(&self, user_id: i32) -> AppResult<CartContents> {
        let now = Utc::now();
        Ok(CartContents {
            cart: Cart {
                id: 1,
                user_id,
                is_active: true,
                total: Decimal::ZERO,
                created_at: now,
                updated_at: now,
            },
            items: vec![],
        })
    }

    async fn add_item(
        &self,
        _user_id: i32,
        _product_id: i32,
        _quantity: i32,
    ) -> AppResult<Decimal> {
        Ok(dec!(10.00))
    }

    async fn set_quantity(
        &self,
        _user_id: i32,
        _product_id: i32,
        _quantity: i32,
    ) -> AppResult<Decimal> {
        Ok(dec!(10.00))
    }

    async fn remove_item(&self, _user_id: i32, _product_id: i32) -> AppResult<Decimal> {
        Ok(Decimal::ZERO)
    }

    async fn clear(&self, _user_id: i32) -> AppResult<Decimal> {
        Ok(Decimal::ZERO)
    }

    async fn close(&self, _user_id: i32) -> AppResult<()> {
        Ok(())
    }
}

struct MockOrderService;

#[async_trait]
impl OrderService for MockOrderService {
    async fn list_all_orders(&self) -> AppResult<Vec<OrderWithUser>> {
        Ok(vec![])
    }

    async fn list_orders_for_user(&self, user_id: i32) -> AppResult<Vec<Order>> {
        Ok(vec![Order {
            id: 1,
            user_id,
            total: dec!(57.49),
            status: "PENDING".to_string(),
            created_at: Utc::now(),
        }])
    }
}

// =============================================================================
// Harness
// =============================================================================

fn test_app() -> axum::Router {
    let state = AppState::new(
        Arc::new(MockAuthService),
        Arc::new(MockUserService),
        Arc::new(MockCategoryService),
        Arc::new(MockProductService),
        Arc::new(MockCartService),
        Arc::new(MockOrderService),
        Arc::new(Database::from_connection(
            sea_orm::DatabaseConnection::default(),
        )),
    );
    create_router(state)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn json(method: Method, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

// =============================================================================
// Authentication endpoints
// =============================================================================

#[tokio::test]
async fn test_register_returns_created() {
    let response = test_app()
        .oneshot(json(
            Method::POST,
            "/auth/register",
            None,
            r#"{"email":"new@example.com","password":"SecurePass123!","name":"New User"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let response = test_app()
        .oneshot(json(
            Method::POST,
            "/auth/register",
            None,
            r#"{"email":"not-an-email","password":"SecurePass123!","name":"New User"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_returns_token() {
    let response = test_app()
        .oneshot(json(
            Method::POST,
            "/auth/login",
            None,
            r#"{"email":"user1@example.com","password":"SecurePass123!"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["access_token"], "user-token");
    assert_eq!(body["token_type"], "Bearer");
}

// =============================================================================
// Role-gated endpoints
// =============================================================================

#[tokio::test]
async fn test_list_users_requires_token() {
    let response = test_app().oneshot(get("/users", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_users_rejects_invalid_token() {
    let response = test_app()
        .oneshot(get("/users", Some("garbage")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_users_denied_for_plain_user() {
    let response = test_app()
        .oneshot(get("/users", Some("user-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_users_allowed_for_admin() {
    let response = test_app()
        .oneshot(get("/users", Some("admin-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_product_requires_admin() {
    let body = r#"{"name":"Skillet","price":"29.90","stock":5,"reference":"PROD-002"}"#;

    let unauthenticated = test_app()
        .oneshot(json(Method::POST, "/products", None, body))
        .await
        .unwrap();
    assert_eq!(unauthenticated.status(), StatusCode::UNAUTHORIZED);

    let as_user = test_app()
        .oneshot(json(Method::POST, "/products", Some("user-token"), body))
        .await
        .unwrap();
    assert_eq!(as_user.status(), StatusCode::FORBIDDEN);

    let as_admin = test_app()
        .oneshot(json(Method::POST, "/products", Some("admin-token"), body))
        .await
        .unwrap();
    assert_eq!(as_admin.status(), StatusCode::CREATED);
}

// =============================================================================
// Ownership-gated endpoints
// =============================================================================

#[tokio::test]
async fn test_get_own_account_allowed() {
    let response = test_app()
        .oneshot(get("/users/1", Some("user-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_other_account_denied() {
    let response = test_app()
        .oneshot(get("/users/2", Some("user-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_bypasses_ownership() {
    let response = test_app()
        .oneshot(get("/users/2", Some("admin-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_current_user_endpoint() {
    let with_token = test_app()
        .oneshot(get("/users/me", Some("user-token")))
        .await
        .unwrap();
    assert_eq!(with_token.status(), StatusCode::OK);

    let without_token = test_app().oneshot(get("/users/me", None)).await.unwrap();
    assert_eq!(without_token.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_prefix_is_optional() {
    // The raw token without the "Bearer " prefix is accepted
    let request = Request::builder()
        .method(Method::GET)
        .uri("/users/me")
        .header(header::AUTHORIZATION, "user-token")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cart_owner_only() {
    let own = test_app()
        .oneshot(get("/cart?user_id=1", Some("user-token")))
        .await
        .unwrap();
    assert_eq!(own.status(), StatusCode::OK);

    let other = test_app()
        .oneshot(get("/cart?user_id=2", Some("user-token")))
        .await
        .unwrap();
    assert_eq!(other.status(), StatusCode::FORBIDDEN);

    let unauthenticated = test_app().oneshot(get("/cart?user_id=1", None)).await.unwrap();
    assert_eq!(unauthenticated.status(), StatusCode::UNAUTHORIZED);

    let admin = test_app()
        .oneshot(get("/cart?user_id=1", Some("admin-token")))
        .await
        .unwrap();
    assert_eq!(admin.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_add_to_cart_denied_for_other_user() {
    let body = r#"{"user_id":2,"product_id":7,"quantity":1}"#;
    let response = test_app()
        .oneshot(json(Method::POST, "/cart/items", Some("user-token"), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_add_to_cart_allowed_for_owner() {
    let body = r#"{"user_id":1,"product_id":7,"quantity":2}"#;
    let response = test_app()
        .oneshot(json(Method::POST, "/cart/items", Some("user-token"), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_orders_owner_and_admin() {
    let own = test_app()
        .oneshot(get("/orders?user_id=1", Some("user-token")))
        .await
        .unwrap();
    assert_eq!(own.status(), StatusCode::OK);

    let other = test_app()
        .oneshot(get("/orders?user_id=2", Some("user-token")))
        .await
        .unwrap();
    assert_eq!(other.status(), StatusCode::FORBIDDEN);

    let admin = test_app()
        .oneshot(get("/orders?user_id=2", Some("admin-token")))
        .await
        .unwrap();
    assert_eq!(admin.status(), StatusCode::OK);
}

// =============================================================================
// Public surface and CORS
// =============================================================================

#[tokio::test]
async fn test_product_reads_are_public() {
    let list = test_app().oneshot(get("/products", None)).await.unwrap();
    assert_eq!(list.status(), StatusCode::OK);

    let one = test_app().oneshot(get("/products/1", None)).await.unwrap();
    assert_eq!(one.status(), StatusCode::OK);

    let categories = test_app().oneshot(get("/categories", None)).await.unwrap();
    assert_eq!(categories.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_preflight_is_uniform_204() {
    for uri in ["/cart/items", "/users", "/products"] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT, "preflight {}", uri);
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
