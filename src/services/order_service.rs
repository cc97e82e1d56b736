//! Order service - read access to placed orders.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Order, OrderWithUser};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

/// Order service trait for dependency injection.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// All orders with their owner summaries (admin listing)
    async fn list_all_orders(&self) -> AppResult<Vec<OrderWithUser>>;

    /// Orders belonging to one user
    async fn list_orders_for_user(&self, user_id: i32) -> AppResult<Vec<Order>>;
}

/// Concrete implementation of OrderService using Unit of Work.
pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> OrderManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    async fn list_all_orders(&self) -> AppResult<Vec<OrderWithUser>> {
        self.uow.orders().list_all().await
    }

    async fn list_orders_for_user(&self, user_id: i32) -> AppResult<Vec<Order>> {
        self.uow.orders().list_for_user(user_id).await
    }
}
