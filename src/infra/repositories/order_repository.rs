//! Order repository - read access to placed orders.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::entities::order::{self, Entity as Orders};
use crate::domain::{Order, OrderUser, OrderWithUser};
use crate::errors::AppResult;

/// Order repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// All orders with their owner summaries (admin listing)
    async fn list_all(&self) -> AppResult<Vec<OrderWithUser>>;

    /// Orders belonging to one user
    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Order>>;
}

/// SeaORM-backed implementation of [`OrderRepository`].
pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn list_all(&self) -> AppResult<Vec<OrderWithUser>> {
        let rows = Orders::find()
            .find_also_related(super::entities::user::Entity)
            .order_by_asc(order::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(order, user)| OrderWithUser {
                order: Order::from(order),
                user: user.map(|u| OrderUser {
                    id: u.id,
                    email: u.email,
                    name: u.name,
                }),
            })
            .collect())
    }

    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Order>> {
        let models = Orders::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_asc(order::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Order::from).collect())
    }
}
