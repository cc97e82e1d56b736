//! Category repository - data access for product categories.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::category::{self, Entity as Categories};
use crate::domain::Category;
use crate::errors::{AppError, AppResult};

/// Category repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Find category by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Category>>;

    /// Find category by slug
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>>;

    /// Find category by exact name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>>;

    /// List all categories
    async fn list(&self) -> AppResult<Vec<Category>>;

    /// Create a new category
    async fn create(&self, name: String, slug: String, reference: String) -> AppResult<Category>;

    /// Rename a category, updating its derived identifiers
    async fn update(
        &self,
        id: i32,
        name: String,
        slug: String,
        reference: String,
    ) -> AppResult<Category>;

    /// Delete category by ID
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// SeaORM-backed implementation of [`CategoryRepository`].
pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Category>> {
        let result = Categories::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Category::from))
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>> {
        let result = Categories::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await?;
        Ok(result.map(Category::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let result = Categories::find()
            .filter(category::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(result.map(Category::from))
    }

    async fn list(&self) -> AppResult<Vec<Category>> {
        let models = Categories::find()
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn create(&self, name: String, slug: String, reference: String) -> AppResult<Category> {
        let active = category::ActiveModel {
            name: Set(name),
            slug: Set(slug),
            reference: Set(reference),
            ..Default::default()
        };

        let model = active.insert(&self.db).await?;
        Ok(Category::from(model))
    }

    async fn update(
        &self,
        id: i32,
        name: String,
        slug: String,
        reference: String,
    ) -> AppResult<Category> {
        let model = Categories::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: category::ActiveModel = model.into();
        active.name = Set(name);
        active.slug = Set(slug);
        active.reference = Set(reference);

        let model = active.update(&self.db).await?;
        Ok(Category::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = Categories::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
