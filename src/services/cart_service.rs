//! Cart service - the cart aggregate and its consistency rules.
//!
//! The aggregate operations in [`ops`] own the invariants: one line item per
//! product, totals recomputed from the full item set after every mutation,
//! price snapshots captured at add time. They are written against the
//! repository traits so the same code runs inside a serializable transaction
//! in production (via [`UnitOfWork`]) and against in-memory fakes in tests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::domain::CartContents;
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Cart service trait for dependency injection.
///
/// All mutations operate on the target user's active cart, creating it
/// lazily on the first addition. Mutations return the recomputed total.
#[async_trait]
pub trait CartService: Send + Sync {
    /// The user's active cart with its line items
    async fn get_cart(&self, user_id: i32) -> AppResult<CartContents>;

    /// Add a product to the cart (merging with an existing line)
    async fn add_item(&self, user_id: i32, product_id: i32, quantity: i32) -> AppResult<Decimal>;

    /// Overwrite a line's quantity; `<= 0` removes the line
    async fn set_quantity(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> AppResult<Decimal>;

    /// Remove a product's line from the cart (idempotent)
    async fn remove_item(&self, user_id: i32, product_id: i32) -> AppResult<Decimal>;

    /// Remove every line, keeping the cart row with a zero total
    async fn clear(&self, user_id: i32) -> AppResult<Decimal>;

    /// Delete the cart row outright
    async fn close(&self, user_id: i32) -> AppResult<()>;
}

/// Aggregate operations.
///
/// Each function runs a full lookup/mutate/recompute sequence and assumes
/// the caller provides per-cart mutual exclusion (a transaction in
/// production). None of them silently no-op on a missing product or line
/// item; absence surfaces as a typed error.
pub mod ops {
    use super::*;
    use crate::domain::cart_total;
    use crate::infra::{CartRepository, ProductPricing};

    /// Add `quantity` of a product to the user's active cart.
    ///
    /// Creates the cart lazily. An existing line is incremented rather than
    /// duplicated; a new line snapshots the current catalog price. The
    /// product must exist before anything is inserted.
    pub async fn add_item(
        carts: &dyn CartRepository,
        prices: &dyn ProductPricing,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> AppResult<Decimal> {
        if quantity <= 0 {
            return Err(AppError::bad_request("quantity must be positive"));
        }

        let cart = match carts.find_active_for_user(user_id).await? {
            Some(cart) => cart,
            None => carts.create_for_user(user_id).await?,
        };

        match carts.find_item(cart.id, product_id).await? {
            Some(existing) => {
                carts
                    .set_item_quantity(existing.id, existing.quantity + quantity)
                    .await?;
            }
            None => {
                let unit_price = prices
                    .price_of(product_id)
                    .await?
                    .ok_or(AppError::ProductNotFound)?;
                carts
                    .insert_item(cart.id, product_id, quantity, unit_price)
                    .await?;
            }
        }

        recompute_total(carts, cart.id).await
    }

    /// Overwrite the quantity of an existing line.
    ///
    /// A non-positive quantity removes the line instead.
    pub async fn set_quantity(
        carts: &dyn CartRepository,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> AppResult<Decimal> {
        if quantity <= 0 {
            return remove_item(carts, user_id, product_id).await;
        }

        let cart = carts
            .find_active_for_user(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let item = carts
            .find_item(cart.id, product_id)
            .await?
            .ok_or(AppError::ItemNotFound)?;

        carts.set_item_quantity(item.id, quantity).await?;
        recompute_total(carts, cart.id).await
    }

    /// Remove a product's line from the cart.
    ///
    /// Deleting an absent line is not an error; the total still gets
    /// recomputed, leaving the cart unchanged.
    pub async fn remove_item(
        carts: &dyn CartRepository,
        user_id: i32,
        product_id: i32,
    ) -> AppResult<Decimal> {
        let cart = carts
            .find_active_for_user(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        carts.delete_item(cart.id, product_id).await?;
        recompute_total(carts, cart.id).await
    }

    /// Delete all lines, reset the total to zero, keep the cart row.
    pub async fn clear_items(carts: &dyn CartRepository, user_id: i32) -> AppResult<Decimal> {
        let cart = carts
            .find_active_for_user(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        carts.delete_items(cart.id).await?;
        recompute_total(carts, cart.id).await
    }

    /// Delete the cart row and its lines outright.
    pub async fn close_cart(carts: &dyn CartRepository, user_id: i32) -> AppResult<()> {
        let cart = carts
            .find_active_for_user(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        carts.delete_items(cart.id).await?;
        carts.delete_cart(cart.id).await
    }

    /// Recompute a cart total from its current lines and persist it.
    ///
    /// Always a full recompute over the item set, never an incremental
    /// adjustment, so partial failures and concurrent mutations cannot
    /// leave drift behind.
    pub async fn recompute_total(carts: &dyn CartRepository, cart_id: i32) -> AppResult<Decimal> {
        let items = carts.items(cart_id).await?;
        let total = cart_total(&items);
        carts.set_total(cart_id, total).await?;
        Ok(total)
    }
}

/// Concrete implementation of CartService using Unit of Work.
///
/// Every mutation sequence runs inside a serializable transaction scoped to
/// the cart's rows, so two concurrent mutations of the same cart cannot
/// produce a lost update, and partial application is never observable.
pub struct CartManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CartManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CartService for CartManager<U> {
    async fn get_cart(&self, user_id: i32) -> AppResult<CartContents> {
        let carts = self.uow.carts();
        let cart = carts
            .find_active_for_user(user_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let items = carts.items(cart.id).await?;
        Ok(CartContents { cart, items })
    }

    async fn add_item(&self, user_id: i32, product_id: i32, quantity: i32) -> AppResult<Decimal> {
        self.uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move {
                    ops::add_item(&ctx.carts(), &ctx.prices(), user_id, product_id, quantity).await
                })
            })
            .await
    }

    async fn set_quantity(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> AppResult<Decimal> {
        self.uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move {
                    ops::set_quantity(&ctx.carts(), user_id, product_id, quantity).await
                })
            })
            .await
    }

    async fn remove_item(&self, user_id: i32, product_id: i32) -> AppResult<Decimal> {
        self.uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move { ops::remove_item(&ctx.carts(), user_id, product_id).await })
            })
            .await
    }

    async fn clear(&self, user_id: i32) -> AppResult<Decimal> {
        self.uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move { ops::clear_items(&ctx.carts(), user_id).await })
            })
            .await
    }

    async fn close(&self, user_id: i32) -> AppResult<()> {
        self.uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move { ops::close_cart(&ctx.carts(), user_id).await })
            })
            .await
    }
}
