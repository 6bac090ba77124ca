//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Emit one access line per request
//! - Mask credential-like fields before they reach a log line
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, text format for development
//! - Log level configurable via config and `RUST_LOG`
//! - Access logging runs after the response exists and cannot fail it

use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::http::request::{RequestId, RequestParams};
use crate::observability::metrics;

/// Replacement for masked values.
pub const MASK: &str = "***";

/// Field names that are always masked.
const SENSITIVE_KEYS: [&str; 5] = ["gateway_token", "api_key", "botToken", "token", "password"];

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("provisioning_api={level},access={level},tower_http=warn", level = config.log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {e}");
    }
}

/// Returns true if values under `key` must never be logged.
pub fn is_sensitive_key(key: &str) -> bool {
    if SENSITIVE_KEYS.contains(&key) {
        return true;
    }
    let lower = key.to_ascii_lowercase();
    lower.contains("token")
        || lower.contains("secret")
        || lower.contains("password")
        || lower.contains("credential")
        || lower.ends_with("key")
}

/// Copy of `value` with every sensitive field replaced by [`MASK`].
pub fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let v = if is_sensitive_key(k) {
                        Value::String(MASK.to_string())
                    } else {
                        redact(v)
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}

/// Log one line per request: timestamp, method, path, status and the
/// redacted request body, if one was parsed.
pub async fn access_log_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let mut response = next.run(request).await;

    let status = response.status().as_u16();
    let params = response
        .extensions_mut()
        .remove::<RequestParams>()
        .map(|p| redact(&p.0))
        .unwrap_or(Value::Null);

    tracing::info!(
        target: "access",
        timestamp = %Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        request_id = %request_id,
        method = %method,
        path = %path,
        status,
        params = %params,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );
    metrics::record_request(method.as_str(), status, start);

    response
}
