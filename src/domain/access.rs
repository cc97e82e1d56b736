//! Access policy - session identity and authorization decisions.
//!
//! The two policy checks (role-gated and ownership-gated) are pure functions
//! over an already-verified session. They never perform I/O and never panic;
//! every input maps to an [`AccessDecision`] that callers translate directly
//! into a transport response.

use chrono::{DateTime, Utc};

use crate::domain::UserRole;
use crate::errors::{AppError, AppResult};

/// Verified identity extracted from a session token.
///
/// Ephemeral: built once per request by token verification and dropped when
/// the request completes. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub subject_id: i32,
    pub role: UserRole,
    pub name: String,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Check if the session belongs to an administrator.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Outcome of an authorization check.
///
/// A plain value carrying the decision, an HTTP-style status and a reason.
/// Handlers pattern-match on `permitted` or call [`AccessDecision::authorize`]
/// to convert a denial into the matching error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    pub permitted: bool,
    pub status_code: u16,
    pub reason: &'static str,
}

impl AccessDecision {
    /// Access granted.
    pub fn permitted() -> Self {
        Self {
            permitted: true,
            status_code: 200,
            reason: "access granted",
        }
    }

    /// Access denied with the given status and reason.
    pub fn denied(status_code: u16, reason: &'static str) -> Self {
        Self {
            permitted: false,
            status_code,
            reason,
        }
    }

    /// Convert the decision into a result, erroring on denial.
    pub fn authorize(self) -> AppResult<()> {
        if self.permitted {
            Ok(())
        } else {
            Err(AppError::Denied(self))
        }
    }
}

/// Missing or unverifiable token.
fn unauthenticated() -> AccessDecision {
    AccessDecision::denied(401, "missing or invalid token")
}

/// Require a minimum privilege level.
///
/// Absent session yields 401; an authenticated session below the required
/// level yields 403.
pub fn require_role(session: Option<&Session>, minimum: UserRole) -> AccessDecision {
    let Some(session) = session else {
        return unauthenticated();
    };

    if !session.role.can_access(&minimum) {
        return AccessDecision::denied(403, "admin access required");
    }

    AccessDecision::permitted()
}

/// Require that the session owns the target account, or is an admin.
///
/// Admins bypass the ownership check entirely.
pub fn require_owner_or_admin(session: Option<&Session>, target_user_id: i32) -> AccessDecision {
    let Some(session) = session else {
        return unauthenticated();
    };

    if session.is_admin() || session.subject_id == target_user_id {
        return AccessDecision::permitted();
    }

    AccessDecision::denied(403, "access restricted to the account owner")
}
