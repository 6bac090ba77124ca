//! Bearer token authentication.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::http::response::ApiError;
use crate::http::server::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Verifies `Authorization: Bearer <token>` against the pre-shared secret.
#[derive(Clone)]
pub struct BearerAuth {
    token: Vec<u8>,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into().into_bytes(),
        }
    }

    /// Length of the configured secret, for startup logging.
    pub fn token_len(&self) -> usize {
        self.token.len()
    }

    /// Check a raw `Authorization` header value.
    pub fn verify(&self, header: Option<&str>) -> bool {
        match header.and_then(|h| h.strip_prefix(BEARER_PREFIX)) {
            Some(provided) => constant_time_eq(provided.as_bytes(), &self.token),
            None => false,
        }
    }

    pub fn verify_headers(&self, headers: &HeaderMap) -> bool {
        self.verify(headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()))
    }
}

impl std::fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerAuth")
            .field("token_len", &self.token.len())
            .finish()
    }
}

/// Byte-for-byte equality whose running time does not depend on where the
/// first differing byte is. A length mismatch returns early.
pub fn constant_time_eq(provided: &[u8], expected: &[u8]) -> bool {
    if provided.len() != expected.len() {
        return false;
    }
    bool::from(provided.ct_eq(expected))
}

/// Reject every request that is not for a public endpoint and does not carry
/// the configured bearer token.
pub async fn bearer_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let public = state
        .router
        .match_request(request.method(), request.uri().path())
        .is_some_and(|m| m.endpoint.is_public());

    if public || state.auth.verify_headers(request.headers()) {
        return next.run(request).await;
    }

    tracing::warn!(
        method = %request.method(),
        path = %request.uri().path(),
        "Rejected request without valid bearer token"
    );
    ApiError::Unauthorized.into_response()
}
