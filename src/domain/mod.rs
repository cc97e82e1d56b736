//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod access;
pub mod cart;
pub mod category;
pub mod order;
pub mod password;
pub mod product;
pub mod user;

pub use access::{require_owner_or_admin, require_role, AccessDecision, Session};
pub use cart::{cart_total, Cart, CartContents, CartItem};
pub use category::{slugify, Category};
pub use order::{Order, OrderUser, OrderWithUser};
pub use password::Password;
pub use product::{NewProduct, Product, ProductChanges};
pub use user::{User, UserResponse, UserRole};
