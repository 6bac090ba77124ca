//! Request context.
//!
//! # Responsibilities
//! - Assign a request ID (UUID v4) unless the caller sent one
//! - Carry the parsed body to the access log
//! - Read typed fields out of a parsed JSON body
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Non-string values are never treated as a name, template or domain

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Correlation ID for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Parsed request body, attached to the response for the access log.
#[derive(Debug, Clone)]
pub struct RequestParams(pub Value);

/// Ensure every request and response carries `x-request-id`.
pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request.extensions_mut().insert(RequestId(id.clone()));
    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}

/// Field access over a parsed JSON body.
#[derive(Debug, Clone, Copy)]
pub struct RequestBody<'a>(&'a Value);

impl<'a> RequestBody<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(value)
    }

    /// Raw value under `key`.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.get(key)
    }

    /// String value under `key`; other JSON types read as absent.
    pub fn str(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Optional pass-through value: a non-empty string or a number.
    /// `null`, `false`, `""` and missing keys are absent.
    pub fn optional_text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// True when `key` holds something other than `null`, `false` or `""`.
    pub fn is_set(&self, key: &str) -> bool {
        match self.get(key) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}
