//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod cart_repository;
mod category_repository;
pub(crate) mod entities;
mod order_repository;
pub(crate) mod product_repository;
mod user_repository;

pub use cart_repository::{CartRepository, CartStore};
pub use category_repository::{CategoryRepository, CategoryStore};
pub use order_repository::{OrderRepository, OrderStore};
pub use product_repository::{ProductPricing, ProductRepository, ProductStore};
pub use user_repository::{UserRepository, UserStore};

pub(crate) use cart_repository as cart_queries;
pub(crate) use product_repository as product_queries;

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use cart_repository::MockCartRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::{MockProductPricing, MockProductRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
