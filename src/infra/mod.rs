//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    CartRepository, CartStore, CategoryRepository, CategoryStore, OrderRepository, OrderStore,
    ProductPricing, ProductRepository, ProductStore, UserRepository, UserStore,
};
pub use unit_of_work::{
    Persistence, TransactionContext, TxCartRepository, TxProductPricing, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockCartRepository, MockCategoryRepository, MockOrderRepository, MockProductPricing,
    MockProductRepository, MockUserRepository,
};
