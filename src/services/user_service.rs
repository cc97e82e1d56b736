//! User service - Handles user-related business logic.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: i32) -> AppResult<User>;

    /// List all users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Create a user with an explicit role (admin operation)
    async fn create_user(
        &self,
        email: String,
        password: String,
        name: String,
        role: UserRole,
    ) -> AppResult<User>;

    /// Update profile fields (name and/or email)
    async fn update_profile(
        &self,
        id: i32,
        name: Option<String>,
        email: Option<String>,
    ) -> AppResult<User>;

    /// Delete user by ID
    async fn delete_user(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn create_user(
        &self,
        email: String,
        password: String,
        name: String,
        role: UserRole,
    ) -> AppResult<User> {
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&password)?.into_string();
        self.uow.users().create(email, password_hash, name, role).await
    }

    async fn update_profile(
        &self,
        id: i32,
        name: Option<String>,
        email: Option<String>,
    ) -> AppResult<User> {
        // A changed email must stay unique
        if let Some(email) = &email {
            if let Some(existing) = self.uow.users().find_by_email(email).await? {
                if existing.id != id {
                    return Err(AppError::conflict("User"));
                }
            }
        }

        self.uow.users().update_profile(id, name, email).await
    }

    async fn delete_user(&self, id: i32) -> AppResult<()> {
        self.uow.users().delete(id).await
    }
}
