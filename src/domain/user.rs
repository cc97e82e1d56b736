//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{ROLE_ADMIN, ROLE_USER};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Numeric privilege level (USER=1, ADMIN=2)
    pub fn level(&self) -> u8 {
        match self {
            UserRole::User => 1,
            UserRole::Admin => 2,
        }
    }

    /// Check if this role satisfies a required minimum role
    pub fn can_access(&self, required: &UserRole) -> bool {
        self.level() >= required.level()
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", ROLE_ADMIN),
            UserRole::User => write!(f, "{}", ROLE_USER),
        }
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = 1)]
    pub id: i32,
    /// User email address
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User display name
    #[schema(example = "John Doe")]
    pub name: String,
    /// User role
    #[schema(example = "USER")]
    pub role: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role.to_string(),
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_levels() {
        assert_eq!(UserRole::User.level(), 1);
        assert_eq!(UserRole::Admin.level(), 2);
    }

    #[test]
    fn test_role_access() {
        assert!(UserRole::Admin.can_access(&UserRole::User));
        assert!(UserRole::Admin.can_access(&UserRole::Admin));
        assert!(UserRole::User.can_access(&UserRole::User));
        assert!(!UserRole::User.can_access(&UserRole::Admin));
    }

    #[test]
    fn test_role_string_round_trip() {
        assert_eq!(UserRole::from("ADMIN"), UserRole::Admin);
        assert_eq!(UserRole::from("USER"), UserRole::User);
        // Unknown roles fall back to the least privileged
        assert_eq!(UserRole::from("superuser"), UserRole::User);
        assert_eq!(UserRole::Admin.to_string(), "ADMIN");
    }
}
