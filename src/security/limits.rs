//! Bounded request body reading.
//!
//! # Responsibilities
//! - Read the body frame by frame, counting bytes
//! - Stop reading as soon as the cap is exceeded
//! - Parse the buffered bytes as a single JSON value
//!
//! # Design Decisions
//! - An empty body is an empty object, not an error
//! - Oversize and malformed bodies are distinct errors
//! - Only routes that take a body call the reader

use axum::body::Body;
use futures_util::StreamExt;
use serde_json::Value;

/// Default body cap in bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 10_000;

/// Failure while reading a request body.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("Request body exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("Invalid JSON payload")]
    Malformed(#[source] serde_json::Error),
    #[error("Failed to read request body: {0}")]
    Read(String),
}

/// Read at most `limit` bytes of `body` and parse them as JSON.
pub async fn read_json_body(body: Body, limit: usize) -> Result<Value, PayloadError> {
    let mut stream = body.into_data_stream();
    let mut buf: Vec<u8> = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| PayloadError::Read(e.to_string()))?;
        if buf.len() + chunk.len() > limit {
            return Err(PayloadError::TooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
    }

    if buf.is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_slice(&buf).map_err(PayloadError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use serde_json::json;

    fn chunks(parts: Vec<Vec<u8>>) -> Body {
        let stream = futures_util::stream::iter(
            parts
                .into_iter()
                .map(|p| Ok::<_, std::io::Error>(Bytes::from(p))),
        );
        Body::from_stream(stream)
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_object() {
        let value = read_json_body(Body::empty(), DEFAULT_MAX_BODY_BYTES).await.unwrap();
        assert_eq!(value, json!({}));
    }

    #[tokio::test]
    async fn test_parses_object() {
        let value = read_json_body(Body::from(r#"{"name":"alice"}"#), DEFAULT_MAX_BODY_BYTES)
            .await
            .unwrap();
        assert_eq!(value, json!({"name": "alice"}));
    }

    #[tokio::test]
    async fn test_malformed() {
        let err = read_json_body(Body::from("{name:"), DEFAULT_MAX_BODY_BYTES)
            .await
            .unwrap_err();
        assert!(matches!(err, PayloadError::Malformed(_)));
        assert_eq!(err.to_string(), "Invalid JSON payload");
    }

    #[tokio::test]
    async fn test_exact_limit_accepted() {
        let padding = "x".repeat(DEFAULT_MAX_BODY_BYTES - r#"{"p":""}"#.len());
        let body = format!(r#"{{"p":"{padding}"}}"#);
        assert_eq!(body.len(), DEFAULT_MAX_BODY_BYTES);
        assert!(read_json_body(Body::from(body), DEFAULT_MAX_BODY_BYTES).await.is_ok());
    }

    #[tokio::test]
    async fn test_oversize_across_chunks() {
        let body = chunks(vec![vec![b' '; 6_000], vec![b' '; 6_000], vec![b' '; 6_000]]);
        let err = read_json_body(body, DEFAULT_MAX_BODY_BYTES).await.unwrap_err();
        assert!(matches!(err, PayloadError::TooLarge { limit: 10_000 }));
    }

    #[tokio::test]
    async fn test_oversize_wins_over_valid_content() {
        let name = "a".repeat(DEFAULT_MAX_BODY_BYTES);
        let body = serde_json::to_vec(&json!({ "name": name })).unwrap();
        let err = read_json_body(Body::from(body), DEFAULT_MAX_BODY_BYTES)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Request body exceeds 10000 bytes");
    }
}
