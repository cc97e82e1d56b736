//! CORS preflight handling.
//!
//! Preflight requests are answered uniformly with 204 and no body,
//! regardless of authentication state. Headers on regular responses are
//! injected by `tower-http`'s `CorsLayer` (see the router).

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

const ALLOW_METHODS: &str = "GET,POST,PUT,DELETE,PATCH,OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Short-circuit OPTIONS requests with an empty 204 carrying the CORS grant.
pub async fn preflight_middleware(request: Request, next: Next) -> Response {
    if request.method() != Method::OPTIONS {
        return next.run(request).await;
    }

    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    response
}
