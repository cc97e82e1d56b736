//! Category service - catalog category management.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{slugify, Category};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Category service trait for dependency injection.
#[async_trait]
pub trait CategoryService: Send + Sync {
    /// List all categories
    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    /// Get category by ID
    async fn get_category(&self, id: i32) -> AppResult<Category>;

    /// Get category by slug
    async fn get_category_by_slug(&self, slug: &str) -> AppResult<Category>;

    /// Create a category, deriving slug and reference from the name
    async fn create_category(&self, name: String) -> AppResult<Category>;

    /// Rename a category, re-deriving slug and reference
    async fn update_category(&self, id: i32, name: String) -> AppResult<Category>;

    /// Delete category by ID
    async fn delete_category(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of CategoryService using Unit of Work.
pub struct CategoryManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CategoryManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CategoryService for CategoryManager<U> {
    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.uow.categories().list().await
    }

    async fn get_category(&self, id: i32) -> AppResult<Category> {
        self.uow
            .categories()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn get_category_by_slug(&self, slug: &str) -> AppResult<Category> {
        self.uow
            .categories()
            .find_by_slug(slug)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn create_category(&self, name: String) -> AppResult<Category> {
        if self.uow.categories().find_by_name(&name).await?.is_some() {
            return Err(AppError::conflict("Category"));
        }

        let slug = slugify(&name);
        let reference = slug.clone();
        self.uow.categories().create(name, slug, reference).await
    }

    async fn update_category(&self, id: i32, name: String) -> AppResult<Category> {
        if let Some(existing) = self.uow.categories().find_by_name(&name).await? {
            if existing.id != id {
                return Err(AppError::conflict("Category"));
            }
        }

        let slug = slugify(&name);
        let reference = slug.clone();
        self.uow
            .categories()
            .update(id, name, slug, reference)
            .await
    }

    async fn delete_category(&self, id: i32) -> AppResult<()> {
        self.uow.categories().delete(id).await
    }
}
