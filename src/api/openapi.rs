//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, cart_handler, category_handler, order_handler, product_handler, user_handler,
};
use crate::domain::{
    Cart, CartContents, CartItem, Category, Order, OrderUser, OrderWithUser, Product,
    UserResponse, UserRole,
};
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the Storefront API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "Storefront REST API with JWT sessions, catalog, cart and orders",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // User endpoints
        user_handler::list_users,
        user_handler::create_user,
        user_handler::get_current_user,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::change_password,
        user_handler::delete_user,
        // Category endpoints
        category_handler::list_categories,
        category_handler::get_category,
        category_handler::get_category_by_slug,
        category_handler::create_category,
        category_handler::update_category,
        category_handler::delete_category,
        // Product endpoints
        product_handler::list_products,
        product_handler::get_product,
        product_handler::get_product_by_reference,
        product_handler::create_product,
        product_handler::update_product,
        product_handler::delete_product,
        // Cart endpoints
        cart_handler::get_cart,
        cart_handler::add_item,
        cart_handler::update_item,
        cart_handler::remove_item,
        cart_handler::clear_cart,
        cart_handler::close_cart,
        // Order endpoints
        order_handler::list_orders,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            Category,
            Product,
            Cart,
            CartItem,
            CartContents,
            Order,
            OrderUser,
            OrderWithUser,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            TokenResponse,
            // User handler types
            user_handler::CreateUserRequest,
            user_handler::UpdateProfileRequest,
            user_handler::ChangePasswordRequest,
            // Catalog handler types
            category_handler::CategoryRequest,
            product_handler::CreateProductRequest,
            product_handler::UpdateProductRequest,
            // Cart handler types
            cart_handler::AddItemRequest,
            cart_handler::UpdateItemRequest,
            cart_handler::RemoveItemRequest,
            cart_handler::CartOwnerRequest,
            // Shared
            MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Users", description = "User management operations"),
        (name = "Categories", description = "Catalog categories"),
        (name = "Products", description = "Catalog products"),
        (name = "Cart", description = "Shopping cart operations"),
        (name = "Orders", description = "Order listings")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
