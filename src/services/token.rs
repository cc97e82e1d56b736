//! Session token codec.
//!
//! Issues and verifies compact signed tokens carrying the session identity.
//! The signing secret lives in [`Config`], loaded once at startup; the codec
//! itself is stateless and safe to share across request handlers.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::domain::{Session, User, UserRole};
use crate::errors::{AppError, AppResult};

/// JWT claims payload (wire format)
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub role: String,
    pub name: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies session tokens.
pub struct TokenCodec {
    config: Config,
}

impl TokenCodec {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Configured token lifetime.
    pub fn ttl(&self) -> Duration {
        Duration::hours(self.config.jwt_expiration_hours)
    }

    /// Produce a signed token for the user, valid for `ttl` from now.
    pub fn issue(&self, user: &User, ttl: Duration) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            role: user.role.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret_bytes()),
        )?;

        Ok(token)
    }

    /// Verify a token and extract the session identity.
    ///
    /// Fails on a bad signature, a past expiry, or a malformed encoding.
    /// Expected failures surface as error values (mapped to 401), never
    /// panics. Callers must check token presence before calling.
    pub fn verify(&self, token: &str) -> AppResult<Session> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        let claims = token_data.claims;
        let issued_at = timestamp(claims.iat)?;
        let expires_at = timestamp(claims.exp)?;

        Ok(Session {
            subject_id: claims.sub,
            role: UserRole::from(claims.role.as_str()),
            name: claims.name,
            email: claims.email,
            issued_at,
            expires_at,
        })
    }
}

/// Out-of-range timestamps are treated like any other malformed token.
fn timestamp(secs: i64) -> AppResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or(AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config::with_secret("test-secret-key-for-testing-32ch!")
    }

    fn test_user(id: i32, role: UserRole) -> User {
        let now = Utc::now();
        User {
            id,
            email: "test@example.com".to_string(),
            password_hash: "hashed".to_string(),
            name: "Test User".to_string(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let codec = TokenCodec::new(test_config());
        let user = test_user(42, UserRole::Admin);

        let token = codec.issue(&user, Duration::hours(1)).unwrap();
        let session = codec.verify(&token).unwrap();

        assert_eq!(session.subject_id, 42);
        assert_eq!(session.role, UserRole::Admin);
        assert_eq!(session.name, "Test User");
        assert_eq!(session.email, "test@example.com");
        assert!(session.expires_at > session.issued_at);
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = TokenCodec::new(test_config());
        let user = test_user(1, UserRole::User);

        // Expired well past the default validation leeway
        let token = codec.issue(&user, Duration::hours(-2)).unwrap();
        assert!(codec.verify(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenCodec::new(test_config());
        let verifier = TokenCodec::new(Config::with_secret("another-secret-key-32-characters!"));
        let user = test_user(1, UserRole::User);

        let token = issuer.issue(&user, Duration::hours(1)).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        let codec = TokenCodec::new(test_config());
        assert!(codec.verify("not-a-token").is_err());
        assert!(codec.verify("").is_err());
    }
}
