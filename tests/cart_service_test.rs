//! Cart aggregate behavior tests.
//!
//! Drives the aggregate operations through in-memory repository fakes so
//! multi-step scenarios (merge-on-add, quantity updates, removal, clearing)
//! can be asserted end to end without a database.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use storefront_api::domain::{cart_total, Cart, CartItem};
use storefront_api::errors::{AppError, AppResult};
use storefront_api::infra::{CartRepository, ProductPricing};
use storefront_api::services::cart_ops;

// =============================================================================
// In-memory fakes
// =============================================================================

#[derive(Default)]
struct CartState {
    carts: Vec<Cart>,
    items: Vec<CartItem>,
    next_cart_id: i32,
    next_item_id: i32,
}

/// In-memory stand-in for the cart storage primitives.
#[derive(Default)]
struct InMemoryCarts {
    state: Mutex<CartState>,
}

impl InMemoryCarts {
    fn new() -> Self {
        Self {
            state: Mutex::new(CartState {
                next_cart_id: 1,
                next_item_id: 1,
                ..Default::default()
            }),
        }
    }

    fn cart(&self, cart_id: i32) -> Option<Cart> {
        self.state
            .lock()
            .unwrap()
            .carts
            .iter()
            .find(|c| c.id == cart_id)
            .cloned()
    }

    fn item_count(&self, cart_id: i32) -> usize {
        self.state
            .lock()
            .unwrap()
            .items
            .iter()
            .filter(|i| i.cart_id == cart_id)
            .count()
    }
}

#[async_trait]
impl CartRepository for InMemoryCarts {
    async fn find_active_for_user(&self, user_id: i32) -> AppResult<Option<Cart>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .carts
            .iter()
            .find(|c| c.user_id == user_id && c.is_active)
            .cloned())
    }

    async fn create_for_user(&self, user_id: i32) -> AppResult<Cart> {
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();
        let cart = Cart {
            id: state.next_cart_id,
            user_id,
            is_active: true,
            total: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        };
        state.next_cart_id += 1;
        state.carts.push(cart.clone());
        Ok(cart)
    }

    async fn items(&self, cart_id: i32) -> AppResult<Vec<CartItem>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .items
            .iter()
            .filter(|i| i.cart_id == cart_id)
            .cloned()
            .collect())
    }

    async fn find_item(&self, cart_id: i32, product_id: i32) -> AppResult<Option<CartItem>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .items
            .iter()
            .find(|i| i.cart_id == cart_id && i.product_id == product_id)
            .cloned())
    }

    async fn insert_item(
        &self,
        cart_id: i32,
        product_id: i32,
        quantity: i32,
        unit_price: Decimal,
    ) -> AppResult<CartItem> {
        let mut state = self.state.lock().unwrap();
        let item = CartItem {
            id: state.next_item_id,
            cart_id,
            product_id,
            quantity,
            unit_price,
        };
        state.next_item_id += 1;
        state.items.push(item.clone());
        Ok(item)
    }

    async fn set_item_quantity(&self, item_id: i32, quantity: i32) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        let item = state
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or(AppError::NotFound)?;
        item.quantity = quantity;
        Ok(())
    }

    async fn delete_item(&self, cart_id: i32, product_id: i32) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state
            .items
            .retain(|i| !(i.cart_id == cart_id && i.product_id == product_id));
        Ok(())
    }

    async fn delete_items(&self, cart_id: i32) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state.items.retain(|i| i.cart_id != cart_id);
        Ok(())
    }

    async fn set_total(&self, cart_id: i32, total: Decimal) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        let cart = state
            .carts
            .iter_mut()
            .find(|c| c.id == cart_id)
            .ok_or(AppError::NotFound)?;
        cart.total = total;
        cart.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_cart(&self, cart_id: i32) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state.carts.retain(|c| c.id != cart_id);
        Ok(())
    }
}

/// In-memory catalog with mutable prices.
struct FakeCatalog {
    prices: Mutex<HashMap<i32, Decimal>>,
}

impl FakeCatalog {
    fn with_prices(prices: &[(i32, Decimal)]) -> Self {
        Self {
            prices: Mutex::new(prices.iter().copied().collect()),
        }
    }

    fn set_price(&self, product_id: i32, price: Decimal) {
        self.prices.lock().unwrap().insert(product_id, price);
    }
}

#[async_trait]
impl ProductPricing for FakeCatalog {
    async fn price_of(&self, product_id: i32) -> AppResult<Option<Decimal>> {
        Ok(self.prices.lock().unwrap().get(&product_id).copied())
    }
}

// =============================================================================
// Scenarios
// =============================================================================

const USER: i32 = 1;

#[tokio::test]
async fn test_first_add_creates_cart_lazily() {
    let carts = InMemoryCarts::new();
    let catalog = FakeCatalog::with_prices(&[(7, dec!(10.00))]);

    assert!(carts.find_active_for_user(USER).await.unwrap().is_none());

    let total = cart_ops::add_item(&carts, &catalog, USER, 7, 2).await.unwrap();

    assert_eq!(total, dec!(20.00));
    let cart = carts.find_active_for_user(USER).await.unwrap().unwrap();
    assert!(cart.is_active);
    assert_eq!(cart.total, dec!(20.00));
}

#[tokio::test]
async fn test_adding_same_product_merges_line() {
    let carts = InMemoryCarts::new();
    let catalog = FakeCatalog::with_prices(&[(7, dec!(10.00))]);

    cart_ops::add_item(&carts, &catalog, USER, 7, 2).await.unwrap();
    let total = cart_ops::add_item(&carts, &catalog, USER, 7, 3).await.unwrap();

    let cart = carts.find_active_for_user(USER).await.unwrap().unwrap();
    assert_eq!(carts.item_count(cart.id), 1);

    let item = carts.find_item(cart.id, 7).await.unwrap().unwrap();
    assert_eq!(item.quantity, 5);
    assert_eq!(total, dec!(50.00));
    assert_eq!(carts.cart(cart.id).unwrap().total, dec!(50.00));
}

#[tokio::test]
async fn test_add_unknown_product_fails_before_insertion() {
    let carts = InMemoryCarts::new();
    let catalog = FakeCatalog::with_prices(&[]);

    let result = cart_ops::add_item(&carts, &catalog, USER, 99, 1).await;

    assert!(matches!(result.unwrap_err(), AppError::ProductNotFound));
    let cart = carts.find_active_for_user(USER).await.unwrap().unwrap();
    assert_eq!(carts.item_count(cart.id), 0);
    assert_eq!(cart.total, Decimal::ZERO);
}

#[tokio::test]
async fn test_add_rejects_non_positive_quantity() {
    let carts = InMemoryCarts::new();
    let catalog = FakeCatalog::with_prices(&[(7, dec!(10.00))]);

    let result = cart_ops::add_item(&carts, &catalog, USER, 7, 0).await;
    assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_price_snapshot_survives_catalog_change() {
    let carts = InMemoryCarts::new();
    let catalog = FakeCatalog::with_prices(&[(7, dec!(10.00)), (9, dec!(4.00))]);

    cart_ops::add_item(&carts, &catalog, USER, 7, 1).await.unwrap();

    // Catalog price changes after the line was added
    catalog.set_price(7, dec!(99.00));
    cart_ops::add_item(&carts, &catalog, USER, 7, 1).await.unwrap();
    let total = cart_ops::add_item(&carts, &catalog, USER, 9, 1).await.unwrap();

    // The product-7 line keeps its original snapshot: 2 x 10.00 + 1 x 4.00
    assert_eq!(total, dec!(24.00));
}

#[tokio::test]
async fn test_set_quantity_overwrites_and_recomputes() {
    let carts = InMemoryCarts::new();
    let catalog = FakeCatalog::with_prices(&[(7, dec!(10.00))]);

    cart_ops::add_item(&carts, &catalog, USER, 7, 2).await.unwrap();
    let total = cart_ops::set_quantity(&carts, USER, 7, 4).await.unwrap();

    assert_eq!(total, dec!(40.00));
}

#[tokio::test]
async fn test_set_quantity_zero_removes_line() {
    let carts = InMemoryCarts::new();
    let catalog = FakeCatalog::with_prices(&[(7, dec!(10.00)), (9, dec!(3.50))]);

    cart_ops::add_item(&carts, &catalog, USER, 7, 2).await.unwrap();
    cart_ops::add_item(&carts, &catalog, USER, 9, 2).await.unwrap();

    let total = cart_ops::set_quantity(&carts, USER, 7, 0).await.unwrap();

    let cart = carts.find_active_for_user(USER).await.unwrap().unwrap();
    assert!(carts.find_item(cart.id, 7).await.unwrap().is_none());
    assert_eq!(total, dec!(7.00));
}

#[tokio::test]
async fn test_set_quantity_missing_line_is_an_error() {
    let carts = InMemoryCarts::new();
    let catalog = FakeCatalog::with_prices(&[(7, dec!(10.00))]);

    cart_ops::add_item(&carts, &catalog, USER, 7, 1).await.unwrap();
    let result = cart_ops::set_quantity(&carts, USER, 99, 3).await;

    assert!(matches!(result.unwrap_err(), AppError::ItemNotFound));
}

#[tokio::test]
async fn test_remove_item_is_idempotent() {
    let carts = InMemoryCarts::new();
    let catalog = FakeCatalog::with_prices(&[(7, dec!(10.00)), (9, dec!(3.50))]);

    cart_ops::add_item(&carts, &catalog, USER, 7, 2).await.unwrap();
    cart_ops::add_item(&carts, &catalog, USER, 9, 1).await.unwrap();

    let first = cart_ops::remove_item(&carts, USER, 7).await.unwrap();
    let second = cart_ops::remove_item(&carts, USER, 7).await.unwrap();

    assert_eq!(first, dec!(3.50));
    assert_eq!(second, first);
    let cart = carts.find_active_for_user(USER).await.unwrap().unwrap();
    assert_eq!(carts.item_count(cart.id), 1);
}

#[tokio::test]
async fn test_clear_keeps_active_cart_with_zero_total() {
    let carts = InMemoryCarts::new();
    let catalog = FakeCatalog::with_prices(&[(7, dec!(10.00))]);

    cart_ops::add_item(&carts, &catalog, USER, 7, 3).await.unwrap();
    let total = cart_ops::clear_items(&carts, USER).await.unwrap();

    assert_eq!(total, Decimal::ZERO);
    let cart = carts.find_active_for_user(USER).await.unwrap().unwrap();
    assert!(cart.is_active);
    assert_eq!(cart.total, Decimal::ZERO);
    assert_eq!(carts.item_count(cart.id), 0);
}

#[tokio::test]
async fn test_close_deletes_cart_and_next_add_starts_fresh() {
    let carts = InMemoryCarts::new();
    let catalog = FakeCatalog::with_prices(&[(7, dec!(10.00))]);

    cart_ops::add_item(&carts, &catalog, USER, 7, 3).await.unwrap();
    cart_ops::close_cart(&carts, USER).await.unwrap();

    assert!(carts.find_active_for_user(USER).await.unwrap().is_none());

    // A new active cart appears lazily on the next add
    let total = cart_ops::add_item(&carts, &catalog, USER, 7, 1).await.unwrap();
    assert_eq!(total, dec!(10.00));
}

#[tokio::test]
async fn test_mutations_without_a_cart_are_not_found() {
    let carts = InMemoryCarts::new();

    assert!(matches!(
        cart_ops::set_quantity(&carts, USER, 7, 2).await.unwrap_err(),
        AppError::NotFound
    ));
    assert!(matches!(
        cart_ops::remove_item(&carts, USER, 7).await.unwrap_err(),
        AppError::NotFound
    ));
    assert!(matches!(
        cart_ops::clear_items(&carts, USER).await.unwrap_err(),
        AppError::NotFound
    ));
    assert!(matches!(
        cart_ops::close_cart(&carts, USER).await.unwrap_err(),
        AppError::NotFound
    ));
}

#[tokio::test]
async fn test_total_invariant_after_mixed_sequence() {
    let carts = InMemoryCarts::new();
    let catalog =
        FakeCatalog::with_prices(&[(1, dec!(2.50)), (2, dec!(11.99)), (3, dec!(0.75))]);

    cart_ops::add_item(&carts, &catalog, USER, 1, 4).await.unwrap();
    cart_ops::add_item(&carts, &catalog, USER, 2, 1).await.unwrap();
    cart_ops::add_item(&carts, &catalog, USER, 3, 10).await.unwrap();
    cart_ops::set_quantity(&carts, USER, 1, 2).await.unwrap();
    cart_ops::remove_item(&carts, USER, 2).await.unwrap();
    cart_ops::add_item(&carts, &catalog, USER, 2, 2).await.unwrap();
    let total = cart_ops::set_quantity(&carts, USER, 3, 0).await.unwrap();

    // The stored total always equals the sum over the current lines
    let cart = carts.find_active_for_user(USER).await.unwrap().unwrap();
    let items = carts.items(cart.id).await.unwrap();
    assert_eq!(cart.total, cart_total(&items));
    assert_eq!(total, dec!(28.98)); // 2 x 2.50 + 2 x 11.99
}
