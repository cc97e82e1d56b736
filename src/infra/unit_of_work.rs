//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and transaction lifecycle. Cart mutation
//! sequences (lookup-or-create, item changes, total recompute) must run
//! through [`UnitOfWork::transaction_serializable`] so concurrent mutations
//! of the same cart cannot interleave partially.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::sync::Arc;

use super::repositories::{
    cart_queries, product_queries, CartRepository, CartStore, CategoryRepository, CategoryStore,
    OrderRepository, OrderStore, ProductPricing, ProductRepository, ProductStore, UserRepository,
    UserStore,
};
use crate::domain::{Cart, CartItem};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction
/// management. Note: the generic `transaction` methods make this trait
/// unsuitable for direct mocking; tests mock the repositories instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get category repository
    fn categories(&self) -> Arc<dyn CategoryRepository>;

    /// Get product repository
    fn products(&self) -> Arc<dyn ProductRepository>;

    /// Get cart repository (non-transactional reads)
    fn carts(&self) -> Arc<dyn CartRepository>;

    /// Get order repository
    fn orders(&self) -> Arc<dyn OrderRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    /// Uses ReadCommitted isolation for balanced consistency/performance.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;

    /// Execute a closure within a serializable transaction.
    ///
    /// Use this for read-modify-write sequences that must not observe
    /// concurrent interleavings (cart mutations).
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part of the
/// same database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Cart repository bound to this transaction
    pub fn carts(&self) -> TxCartRepository<'_> {
        TxCartRepository { txn: self.txn }
    }

    /// Catalog price lookups bound to this transaction
    pub fn prices(&self) -> TxProductPricing<'_> {
        TxProductPricing { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    category_repo: Arc<CategoryStore>,
    product_repo: Arc<ProductStore>,
    cart_repo: Arc<CartStore>,
    order_repo: Arc<OrderStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            category_repo: Arc::new(CategoryStore::new(db.clone())),
            product_repo: Arc::new(ProductStore::new(db.clone())),
            cart_repo: Arc::new(CartStore::new(db.clone())),
            order_repo: Arc::new(OrderStore::new(db.clone())),
            db,
        }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.category_repo.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.product_repo.clone()
    }

    fn carts(&self) -> Arc<dyn CartRepository> {
        self.cart_repo.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.order_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f)
            .await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f)
            .await
    }
}

/// Transaction-scoped cart repository.
///
/// Implements the same storage contract as the pooled store, so the cart
/// aggregate runs unchanged inside and outside a transaction.
pub struct TxCartRepository<'a> {
    txn: &'a DatabaseTransaction,
}

#[async_trait]
impl CartRepository for TxCartRepository<'_> {
    async fn find_active_for_user(&self, user_id: i32) -> AppResult<Option<Cart>> {
        cart_queries::find_active_for_user(self.txn, user_id).await
    }

    async fn create_for_user(&self, user_id: i32) -> AppResult<Cart> {
        cart_queries::create_for_user(self.txn, user_id).await
    }

    async fn items(&self, cart_id: i32) -> AppResult<Vec<CartItem>> {
        cart_queries::items(self.txn, cart_id).await
    }

    async fn find_item(&self, cart_id: i32, product_id: i32) -> AppResult<Option<CartItem>> {
        cart_queries::find_item(self.txn, cart_id, product_id).await
    }

    async fn insert_item(
        &self,
        cart_id: i32,
        product_id: i32,
        quantity: i32,
        unit_price: rust_decimal::Decimal,
    ) -> AppResult<CartItem> {
        cart_queries::insert_item(self.txn, cart_id, product_id, quantity, unit_price).await
    }

    async fn set_item_quantity(&self, item_id: i32, quantity: i32) -> AppResult<()> {
        cart_queries::set_item_quantity(self.txn, item_id, quantity).await
    }

    async fn delete_item(&self, cart_id: i32, product_id: i32) -> AppResult<()> {
        cart_queries::delete_item(self.txn, cart_id, product_id).await
    }

    async fn delete_items(&self, cart_id: i32) -> AppResult<()> {
        cart_queries::delete_items(self.txn, cart_id).await
    }

    async fn set_total(&self, cart_id: i32, total: rust_decimal::Decimal) -> AppResult<()> {
        cart_queries::set_total(self.txn, cart_id, total).await
    }

    async fn delete_cart(&self, cart_id: i32) -> AppResult<()> {
        cart_queries::delete_cart(self.txn, cart_id).await
    }
}

/// Transaction-scoped catalog price lookups.
pub struct TxProductPricing<'a> {
    txn: &'a DatabaseTransaction,
}

#[async_trait]
impl ProductPricing for TxProductPricing<'_> {
    async fn price_of(&self, product_id: i32) -> AppResult<Option<rust_decimal::Decimal>> {
        product_queries::price_of(self.txn, product_id).await
    }
}
