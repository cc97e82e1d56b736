//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, and on the Unit of Work for repository access
//! and transaction management.

mod auth_service;
mod cart_service;
mod category_service;
pub mod container;
mod order_service;
mod product_service;
pub mod token;
mod user_service;

// Service Container
pub use container::Services;

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, TokenResponse};
pub use cart_service::{ops as cart_ops, CartManager, CartService};
pub use category_service::{CategoryManager, CategoryService};
pub use order_service::{OrderManager, OrderService};
pub use product_service::{ProductManager, ProductService};
pub use token::{Claims, TokenCodec};
pub use user_service::{UserManager, UserService};
