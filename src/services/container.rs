//! Service container - centralized service wiring.
//!
//! Constructs every application service over a shared Unit of Work so the
//! API layer depends on service traits only.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, CartManager, CartService, CategoryManager, CategoryService,
    OrderManager, OrderService, ProductManager, ProductService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::Persistence;

/// Concrete service container
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    category_service: Arc<dyn CategoryService>,
    product_service: Arc<dyn ProductService>,
    cart_service: Arc<dyn CartService>,
    order_service: Arc<dyn OrderService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            category_service: Arc::new(CategoryManager::new(uow.clone())),
            product_service: Arc::new(ProductManager::new(uow.clone())),
            cart_service: Arc::new(CartManager::new(uow.clone())),
            order_service: Arc::new(OrderManager::new(uow)),
        }
    }

    pub fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    pub fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    pub fn categories(&self) -> Arc<dyn CategoryService> {
        self.category_service.clone()
    }

    pub fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }

    pub fn carts(&self) -> Arc<dyn CartService> {
        self.cart_service.clone()
    }

    pub fn orders(&self) -> Arc<dyn OrderService> {
        self.order_service.clone()
    }
}
