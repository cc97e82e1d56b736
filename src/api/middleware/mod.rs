//! HTTP middleware.

pub mod auth;
pub mod cors;

pub use auth::{session_middleware, SessionContext};
pub use cors::preflight_middleware;
