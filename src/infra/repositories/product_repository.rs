//! Product repository - data access for the catalog.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::entities::product::{self, Entity as Products};
use crate::domain::{NewProduct, Product, ProductChanges};
use crate::errors::{AppError, AppResult};

/// Read access to live catalog prices.
///
/// The slice of the catalog the cart aggregate depends on; kept separate so
/// the transaction-scoped repository only has to provide this much.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait ProductPricing: Send + Sync {
    /// Look up the live catalog price of a product
    async fn price_of(&self, product_id: i32) -> AppResult<Option<Decimal>>;
}

/// Product repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find product by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>>;

    /// Find product by its unique merchant reference
    async fn find_by_reference(&self, reference: &str) -> AppResult<Option<Product>>;

    /// List products, optionally restricted to a category
    async fn list(&self, category_id: Option<i32>) -> AppResult<Vec<Product>>;

    /// Create a new product
    async fn create(&self, data: NewProduct) -> AppResult<Product>;

    /// Apply field changes to an existing product
    async fn update(&self, id: i32, changes: ProductChanges) -> AppResult<Product>;

    /// Delete product by ID
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// SeaORM-backed implementation of [`ProductRepository`].
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductPricing for ProductStore {
    async fn price_of(&self, product_id: i32) -> AppResult<Option<Decimal>> {
        price_of(&self.db, product_id).await
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        let result = Products::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Product::from))
    }

    async fn find_by_reference(&self, reference: &str) -> AppResult<Option<Product>> {
        let result = Products::find()
            .filter(product::Column::Reference.eq(reference))
            .one(&self.db)
            .await?;
        Ok(result.map(Product::from))
    }

    async fn list(&self, category_id: Option<i32>) -> AppResult<Vec<Product>> {
        let mut query = Products::find().order_by_asc(product::Column::Id);
        if let Some(category_id) = category_id {
            query = query.filter(product::Column::CategoryId.eq(category_id));
        }
        let models = query.all(&self.db).await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn create(&self, data: NewProduct) -> AppResult<Product> {
        let now = chrono::Utc::now();
        let active = product::ActiveModel {
            name: Set(data.name),
            description: Set(data.description),
            price: Set(data.price),
            stock: Set(data.stock),
            reference: Set(data.reference),
            images: Set(data.images),
            category_id: Set(data.category_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active.insert(&self.db).await?;
        Ok(Product::from(model))
    }

    async fn update(&self, id: i32, changes: ProductChanges) -> AppResult<Product> {
        let model = Products::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: product::ActiveModel = model.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(stock) = changes.stock {
            active.stock = Set(stock);
        }
        if let Some(reference) = changes.reference {
            active.reference = Set(reference);
        }
        if let Some(images) = changes.images {
            active.images = Set(images);
        }
        if let Some(category_id) = changes.category_id {
            active.category_id = Set(category_id);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Product::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = Products::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

/// Price lookup shared with the transaction-scoped repository.
pub(crate) async fn price_of<C: ConnectionTrait>(
    conn: &C,
    product_id: i32,
) -> AppResult<Option<Decimal>> {
    let price = Products::find_by_id(product_id)
        .select_only()
        .column(product::Column::Price)
        .into_tuple::<Decimal>()
        .one(conn)
        .await?;
    Ok(price)
}
