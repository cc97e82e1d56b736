//! Product service - catalog product management.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{NewProduct, Product, ProductChanges};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Product service trait for dependency injection.
#[async_trait]
pub trait ProductService: Send + Sync {
    /// List products, optionally restricted to a category
    async fn list_products(&self, category_id: Option<i32>) -> AppResult<Vec<Product>>;

    /// Get product by ID
    async fn get_product(&self, id: i32) -> AppResult<Product>;

    /// Get product by its unique merchant reference
    async fn get_product_by_reference(&self, reference: &str) -> AppResult<Product>;

    /// Create a product (reference must be unused; category must exist)
    async fn create_product(&self, data: NewProduct) -> AppResult<Product>;

    /// Apply changes to a product (a changed reference must stay unique)
    async fn update_product(&self, id: i32, changes: ProductChanges) -> AppResult<Product>;

    /// Delete product by ID
    async fn delete_product(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of ProductService using Unit of Work.
pub struct ProductManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProductManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductManager<U> {
    async fn list_products(&self, category_id: Option<i32>) -> AppResult<Vec<Product>> {
        self.uow.products().list(category_id).await
    }

    async fn get_product(&self, id: i32) -> AppResult<Product> {
        self.uow
            .products()
            .find_by_id(id)
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    async fn get_product_by_reference(&self, reference: &str) -> AppResult<Product> {
        self.uow
            .products()
            .find_by_reference(reference)
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    async fn create_product(&self, data: NewProduct) -> AppResult<Product> {
        // The target category must exist before the product is created
        if let Some(category_id) = data.category_id {
            if self
                .uow
                .categories()
                .find_by_id(category_id)
                .await?
                .is_none()
            {
                return Err(AppError::NotFound);
            }
        }

        if self
            .uow
            .products()
            .find_by_reference(&data.reference)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Product"));
        }

        self.uow.products().create(data).await
    }

    async fn update_product(&self, id: i32, changes: ProductChanges) -> AppResult<Product> {
        if let Some(reference) = &changes.reference {
            if let Some(existing) = self.uow.products().find_by_reference(reference).await? {
                if existing.id != id {
                    return Err(AppError::conflict("Product reference"));
                }
            }
        }

        self.uow.products().update(id, changes).await
    }

    async fn delete_product(&self, id: i32) -> AppResult<()> {
        self.uow.products().delete(id).await
    }
}
