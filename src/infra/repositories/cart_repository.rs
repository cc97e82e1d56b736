//! Cart repository - storage primitives for the cart aggregate.
//!
//! The aggregate's mutation logic lives in the cart service; this module
//! only exposes the row-level operations it composes. The same query bodies
//! back both the pooled-connection store and the transaction-scoped
//! repository handed out by the unit of work, so multi-step mutation
//! sequences run atomically.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use super::entities::{
    cart::{self, Entity as Carts},
    cart_item::{self, Entity as CartItems},
};
use crate::domain::{Cart, CartItem};
use crate::errors::{AppError, AppResult};

/// Cart storage primitives.
///
/// Callers are responsible for scoping multi-step sequences to a single
/// transaction (see `UnitOfWork::transaction`).
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Find the user's active cart, if any
    async fn find_active_for_user(&self, user_id: i32) -> AppResult<Option<Cart>>;

    /// Create a fresh active cart for the user with a zero total
    async fn create_for_user(&self, user_id: i32) -> AppResult<Cart>;

    /// All line items of a cart
    async fn items(&self, cart_id: i32) -> AppResult<Vec<CartItem>>;

    /// Find the line item for a product within a cart
    async fn find_item(&self, cart_id: i32, product_id: i32) -> AppResult<Option<CartItem>>;

    /// Insert a new line item with a price snapshot
    async fn insert_item(
        &self,
        cart_id: i32,
        product_id: i32,
        quantity: i32,
        unit_price: Decimal,
    ) -> AppResult<CartItem>;

    /// Overwrite a line item's quantity
    async fn set_item_quantity(&self, item_id: i32, quantity: i32) -> AppResult<()>;

    /// Delete the line item for a product (no-op when absent)
    async fn delete_item(&self, cart_id: i32, product_id: i32) -> AppResult<()>;

    /// Delete every line item of a cart
    async fn delete_items(&self, cart_id: i32) -> AppResult<()>;

    /// Write a recomputed total back to the cart row
    async fn set_total(&self, cart_id: i32, total: Decimal) -> AppResult<()>;

    /// Delete the cart row itself
    async fn delete_cart(&self, cart_id: i32) -> AppResult<()>;
}

/// SeaORM-backed implementation of [`CartRepository`] on the pooled connection.
pub struct CartStore {
    db: DatabaseConnection,
}

impl CartStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartRepository for CartStore {
    async fn find_active_for_user(&self, user_id: i32) -> AppResult<Option<Cart>> {
        find_active_for_user(&self.db, user_id).await
    }

    async fn create_for_user(&self, user_id: i32) -> AppResult<Cart> {
        create_for_user(&self.db, user_id).await
    }

    async fn items(&self, cart_id: i32) -> AppResult<Vec<CartItem>> {
        items(&self.db, cart_id).await
    }

    async fn find_item(&self, cart_id: i32, product_id: i32) -> AppResult<Option<CartItem>> {
        find_item(&self.db, cart_id, product_id).await
    }

    async fn insert_item(
        &self,
        cart_id: i32,
        product_id: i32,
        quantity: i32,
        unit_price: Decimal,
    ) -> AppResult<CartItem> {
        insert_item(&self.db, cart_id, product_id, quantity, unit_price).await
    }

    async fn set_item_quantity(&self, item_id: i32, quantity: i32) -> AppResult<()> {
        set_item_quantity(&self.db, item_id, quantity).await
    }

    async fn delete_item(&self, cart_id: i32, product_id: i32) -> AppResult<()> {
        delete_item(&self.db, cart_id, product_id).await
    }

    async fn delete_items(&self, cart_id: i32) -> AppResult<()> {
        delete_items(&self.db, cart_id).await
    }

    async fn set_total(&self, cart_id: i32, total: Decimal) -> AppResult<()> {
        set_total(&self.db, cart_id, total).await
    }

    async fn delete_cart(&self, cart_id: i32) -> AppResult<()> {
        delete_cart(&self.db, cart_id).await
    }
}

// Query implementations, generic over the connection.

pub(crate) async fn find_active_for_user<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
) -> AppResult<Option<Cart>> {
    let result = Carts::find()
        .filter(cart::Column::UserId.eq(user_id))
        .filter(cart::Column::IsActive.eq(true))
        .one(conn)
        .await?;
    Ok(result.map(Cart::from))
}

pub(crate) async fn create_for_user<C: ConnectionTrait>(conn: &C, user_id: i32) -> AppResult<Cart> {
    let now = chrono::Utc::now();
    let active = cart::ActiveModel {
        user_id: Set(user_id),
        is_active: Set(true),
        total: Set(Decimal::ZERO),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = active.insert(conn).await?;
    Ok(Cart::from(model))
}

pub(crate) async fn items<C: ConnectionTrait>(conn: &C, cart_id: i32) -> AppResult<Vec<CartItem>> {
    let models = CartItems::find()
        .filter(cart_item::Column::CartId.eq(cart_id))
        .order_by_asc(cart_item::Column::Id)
        .all(conn)
        .await?;
    Ok(models.into_iter().map(CartItem::from).collect())
}

pub(crate) async fn find_item<C: ConnectionTrait>(
    conn: &C,
    cart_id: i32,
    product_id: i32,
) -> AppResult<Option<CartItem>> {
    let result = CartItems::find()
        .filter(cart_item::Column::CartId.eq(cart_id))
        .filter(cart_item::Column::ProductId.eq(product_id))
        .one(conn)
        .await?;
    Ok(result.map(CartItem::from))
}

pub(crate) async fn insert_item<C: ConnectionTrait>(
    conn: &C,
    cart_id: i32,
    product_id: i32,
    quantity: i32,
    unit_price: Decimal,
) -> AppResult<CartItem> {
    let active = cart_item::ActiveModel {
        cart_id: Set(cart_id),
        product_id: Set(product_id),
        quantity: Set(quantity),
        unit_price: Set(unit_price),
        ..Default::default()
    };

    let model = active.insert(conn).await?;
    Ok(CartItem::from(model))
}

pub(crate) async fn set_item_quantity<C: ConnectionTrait>(
    conn: &C,
    item_id: i32,
    quantity: i32,
) -> AppResult<()> {
    let model = CartItems::find_by_id(item_id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: cart_item::ActiveModel = model.into();
    active.quantity = Set(quantity);
    active.update(conn).await?;
    Ok(())
}

pub(crate) async fn delete_item<C: ConnectionTrait>(
    conn: &C,
    cart_id: i32,
    product_id: i32,
) -> AppResult<()> {
    CartItems::delete_many()
        .filter(cart_item::Column::CartId.eq(cart_id))
        .filter(cart_item::Column::ProductId.eq(product_id))
        .exec(conn)
        .await?;
    Ok(())
}

pub(crate) async fn delete_items<C: ConnectionTrait>(conn: &C, cart_id: i32) -> AppResult<()> {
    CartItems::delete_many()
        .filter(cart_item::Column::CartId.eq(cart_id))
        .exec(conn)
        .await?;
    Ok(())
}

pub(crate) async fn set_total<C: ConnectionTrait>(
    conn: &C,
    cart_id: i32,
    total: Decimal,
) -> AppResult<()> {
    let model = Carts::find_by_id(cart_id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: cart::ActiveModel = model.into();
    active.total = Set(total);
    active.updated_at = Set(chrono::Utc::now());
    active.update(conn).await?;
    Ok(())
}

pub(crate) async fn delete_cart<C: ConnectionTrait>(conn: &C, cart_id: i32) -> AppResult<()> {
    Carts::delete_by_id(cart_id).exec(conn).await?;
    Ok(())
}
