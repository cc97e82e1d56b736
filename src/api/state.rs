//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::infra::Database;
use crate::services::{
    AuthService, CartService, CategoryService, OrderService, ProductService, Services, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Category service
    pub category_service: Arc<dyn CategoryService>,
    /// Product service
    pub product_service: Arc<dyn ProductService>,
    /// Cart service
    pub cart_service: Arc<dyn CartService>,
    /// Order service
    pub order_service: Arc<dyn OrderService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    ///
    /// This is the recommended way to create AppState as it uses
    /// the service container for centralized service wiring.
    pub fn from_config(database: Arc<Database>, config: crate::config::Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);

        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            category_service: container.categories(),
            product_service: container.products(),
            cart_service: container.carts(),
            order_service: container.orders(),
            database,
        }
    }

    /// Create application state with manually injected services (tests).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        category_service: Arc<dyn CategoryService>,
        product_service: Arc<dyn ProductService>,
        cart_service: Arc<dyn CartService>,
        order_service: Arc<dyn OrderService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            category_service,
            product_service,
            cart_service,
            order_service,
            database,
        }
    }
}
