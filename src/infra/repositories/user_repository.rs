//! User repository - data access for user accounts.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use super::entities::user::{self, Entity as Users};
use crate::domain::{User, UserRole};
use crate::errors::{AppError, AppResult};

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a new user with the given role
    async fn create(
        &self,
        email: String,
        password_hash: String,
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

    /// Replace the stored password hash
    async fn update_password(&self, id: i32, password_hash: String) -> AppResult<()>;

    /// Delete user by ID
    async fn delete(&self, id: i32) -> AppResult<()>;

    /// List all users
    async fn list(&self) -> AppResult<Vec<User>>;
}

/// SeaORM-backed implementation of [`UserRepository`].
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        find_by_email(&self.db, email).await
    }

    async fn create(
        &self,
        email: String,
        password_hash: String,
        name: String,
        role: UserRole,
    ) -> AppResult<User> {
        create(&self.db, email, password_hash, name, role).await
    }

    async fn update_profile(
        &self,
        id: i32,
        name: Option<String>,
        email: Option<String>,
    ) -> AppResult<User> {
        update_profile(&self.db, id, name, email).await
    }

    async fn update_password(&self, id: i32, password_hash: String) -> AppResult<()> {
        update_password(&self.db, id, password_hash).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        delete(&self.db, id).await
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        list(&self.db).await
    }
}

// Query implementations, generic over the connection so they run against
// either the pooled connection or an open transaction.

pub(crate) async fn find_by_id<C: ConnectionTrait>(conn: &C, id: i32) -> AppResult<Option<User>> {
    let result = Users::find_by_id(id).one(conn).await?;
    Ok(result.map(User::from))
}

pub(crate) async fn find_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> AppResult<Option<User>> {
    let result = Users::find()
        .filter(user::Column::Email.eq(email))
        .one(conn)
        .await?;
    Ok(result.map(User::from))
}

pub(crate) async fn create<C: ConnectionTrait>(
    conn: &C,
    email: String,
    password_hash: String,
    name: String,
    role: UserRole,
) -> AppResult<User> {
    let now = chrono::Utc::now();
    let active = user::ActiveModel {
        email: Set(email),
        password_hash: Set(password_hash),
        name: Set(name),
        role: Set(role.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = active.insert(conn).await?;
    Ok(User::from(model))
}

pub(crate) async fn update_profile<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    name: Option<String>,
    email: Option<String>,
) -> AppResult<User> {
    let model = Users::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: user::ActiveModel = model.into();
    if let Some(name) = name {
        active.name = Set(name);
    }
    if let Some(email) = email {
        active.email = Set(email);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(conn).await?;
    Ok(User::from(model))
}

pub(crate) async fn update_password<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    password_hash: String,
) -> AppResult<()> {
    let model = Users::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: user::ActiveModel = model.into();
    active.password_hash = Set(password_hash);
    active.updated_at = Set(chrono::Utc::now());
    active.update(conn).await?;
    Ok(())
}

pub(crate) async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> AppResult<()> {
    let result = Users::delete_by_id(id).exec(conn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

pub(crate) async fn list<C: ConnectionTrait>(conn: &C) -> AppResult<Vec<User>> {
    let models = Users::find()
        .order_by_asc(user::Column::Id)
        .all(conn)
        .await?;
    Ok(models.into_iter().map(User::from).collect())
}
