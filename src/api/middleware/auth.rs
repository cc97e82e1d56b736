//! Session extraction middleware.
//!
//! The single place where claim extraction happens: the bearer token is
//! pulled from the `Authorization` header and verified, and the resulting
//! [`SessionContext`] is attached to the request. The middleware never
//! rejects on its own; handlers consult the access policy, which turns an
//! unauthenticated context into a uniform 401.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::Session;
use crate::services::AuthService;

/// Per-request authentication state: a verified session, or the explicit
/// unauthenticated marker.
#[derive(Clone, Debug, Default)]
pub struct SessionContext {
    session: Option<Session>,
}

impl SessionContext {
    /// No token, or a token that failed verification.
    pub fn unauthenticated() -> Self {
        Self { session: None }
    }

    pub fn authenticated(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// Extract and verify the token from an `Authorization` header value.
    ///
    /// A missing `Bearer ` prefix is tolerated; the whole remainder is
    /// treated as the token. Verification failure collapses to the
    /// unauthenticated marker so every denial path produces the same 401.
    pub fn from_bearer(auth: &dyn AuthService, header: Option<&str>) -> Self {
        let Some(header) = header else {
            return Self::unauthenticated();
        };

        let token = header.strip_prefix(BEARER_TOKEN_PREFIX).unwrap_or(header);
        match auth.verify_token(token) {
            Ok(session) => Self::authenticated(session),
            Err(_) => Self::unauthenticated(),
        }
    }

    /// The verified session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

/// Attach a [`SessionContext`] to every request.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let context = SessionContext::from_bearer(state.auth_service.as_ref(), header);
    request.extensions_mut().insert(context);

    next.run(request).await
}
