//! Authentication service - registration, login and password changes.
//!
//! Token issue/verify is delegated to the [`TokenCodec`]; password hashing
//! to the domain [`Password`] value object.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{Password, Session, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::services::token::TokenCodec;

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 604800)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register(&self, email: String, password: String, name: String) -> AppResult<User>;

    /// Login and return a session token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Change a user's password after verifying the current one
    async fn change_password(
        &self,
        user_id: i32,
        current_password: String,
        new_password: String,
    ) -> AppResult<()>;

    /// Verify a session token and extract the session identity
    fn verify_token(&self, token: &str) -> AppResult<Session>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    codec: TokenCodec,
    expiration_hours: i64,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self {
            uow,
            expiration_hours: config.jwt_expiration_hours,
            codec: TokenCodec::new(config),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, email: String, password: String, name: String) -> AppResult<User> {
        // Email format is validated by the handler's ValidatedJson extractor
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&password)?.into_string();
        self.uow
            .users()
            .create(email, password_hash, name, UserRole::User)
            .await
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user_result = self.uow.users().find_by_email(&email).await?;

        // SECURITY: Perform password verification even if user doesn't exist
        // to prevent timing attacks that could enumerate valid emails.
        // We use a dummy hash that will always fail verification.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let (password_hash, user_exists) = match &user_result {
            Some(user) => (user.password_hash.as_str(), true),
            None => (dummy_hash, false),
        };

        let stored_password = Password::from_hash(password_hash.to_string());
        let password_valid = stored_password.verify(&password);

        // Only succeed if both user exists AND password is valid
        if !user_exists || !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Safe: user_exists was just checked
        let user = user_result.as_ref().expect("user presence checked above");
        let access_token = self.codec.issue(user, self.codec.ttl())?;

        Ok(TokenResponse {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.expiration_hours * SECONDS_PER_HOUR,
        })
    }

    async fn change_password(
        &self,
        user_id: i32,
        current_password: String,
        new_password: String,
    ) -> AppResult<()> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let stored = Password::from_hash(user.password_hash);
        if !stored.verify(&current_password) {
            return Err(AppError::InvalidCredentials);
        }

        let new_hash = Password::new(&new_password)?.into_string();
        self.uow.users().update_password(user_id, new_hash).await
    }

    fn verify_token(&self, token: &str) -> AppResult<Session> {
        self.codec.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::infra::{
        CartRepository, CategoryRepository, MockUserRepository, OrderRepository,
        ProductRepository, TransactionContext, UserRepository,
    };

    fn user_with_password(id: i32, plain: &str) -> User {
        User {
            id,
            email: "test@example.com".to_string(),
            password_hash: Password::new(plain).unwrap().into_string(),
            name: "Test User".to_string(),
            role: UserRole::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    struct TestUnitOfWork {
        users: Arc<MockUserRepository>,
    }

    impl TestUnitOfWork {
        fn new(users: MockUserRepository) -> Self {
            Self {
                users: Arc::new(users),
            }
        }
    }

    #[async_trait]
    impl UnitOfWork for TestUnitOfWork {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.users.clone()
        }

        fn categories(&self) -> Arc<dyn CategoryRepository> {
            unimplemented!("not used in these tests")
        }

        fn products(&self) -> Arc<dyn ProductRepository> {
            unimplemented!("not used in these tests")
        }

        fn carts(&self) -> Arc<dyn CartRepository> {
            unimplemented!("not used in these tests")
        }

        fn orders(&self) -> Arc<dyn OrderRepository> {
            unimplemented!("not used in these tests")
        }

        async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(
                    TransactionContext<'a>,
                ) -> std::pin::Pin<
                    Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
                > + Send,
            T: Send,
        {
            Err(AppError::internal("Transactions not supported in test mock"))
        }

        async fn transaction_serializable<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(
                    TransactionContext<'a>,
                ) -> std::pin::Pin<
                    Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
                > + Send,
            T: Send,
        {
            Err(AppError::internal("Transactions not supported in test mock"))
        }
    }

    fn authenticator(repo: MockUserRepository) -> Authenticator<TestUnitOfWork> {
        Authenticator::new(
            Arc::new(TestUnitOfWork::new(repo)),
            Config::with_secret("test-secret-key-for-testing-32ch!"),
        )
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(user_with_password(42, "SecurePass123!"))));

        let auth = authenticator(repo);
        let token = auth
            .login("test@example.com".to_string(), "SecurePass123!".to_string())
            .await
            .unwrap();

        assert_eq!(token.token_type, "Bearer");
        let session = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(session.subject_id, 42);
        assert_eq!(session.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(user_with_password(1, "SecurePass123!"))));

        let auth = authenticator(repo);
        let result = auth
            .login("test@example.com".to_string(), "WrongPass123!".to_string())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let auth = authenticator(repo);
        let result = auth
            .login("ghost@example.com".to_string(), "SecurePass123!".to_string())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_register_conflict_on_existing_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(user_with_password(1, "SecurePass123!"))));

        let auth = authenticator(repo);
        let result = auth
            .register(
                "test@example.com".to_string(),
                "SecurePass123!".to_string(),
                "Test User".to_string(),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_change_password_requires_current() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(user_with_password(id, "SecurePass123!"))));

        let auth = authenticator(repo);
        let result = auth
            .change_password(1, "WrongPass123!".to_string(), "NewPass456!".to_string())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
    }
}
