//! Response bodies and error mapping.
//!
//! # Responsibilities
//! - Map every failure to a status code and `{"error": ...}` body
//! - Define the success bodies returned by handlers
//!
//! # Design Decisions
//! - 401 carries a fixed message and nothing else
//! - A partial failure also names the file left on disk
//! - Internal faults surface only their message

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::caddy::RouteWriteError;
use crate::security::PayloadError;

/// Every way a request can fail.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    /// The subprocess ran but failed or timed out; carries its stderr.
    #[error("{0}")]
    Execution(String),
    /// The site file was written but the proxy did not reload.
    #[error("{message}")]
    PartialFailure { message: String, file: PathBuf },
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::Payload(_) => StatusCode::BAD_REQUEST,
            Self::Execution(_) | Self::PartialFailure { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<RouteWriteError> for ApiError {
    fn from(err: RouteWriteError) -> Self {
        match &err {
            RouteWriteError::Write { .. } => Self::Internal(err.to_string()),
            RouteWriteError::Reload { path, .. } => Self::PartialFailure {
                file: path.clone(),
                message: err.to_string(),
            },
        }
    }
}

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let file = match &self {
            Self::PartialFailure { file, .. } => Some(file.display().to_string()),
            _ => None,
        };
        let body = ErrorBody {
            error: self.to_string(),
            file,
        };
        (status, Json(body)).into_response()
    }
}

/// Body for lifecycle transitions: `{"message", "output"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
    pub output: String,
}

/// Body for raw script output: `{"output"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputBody {
    pub output: String,
}

/// Body for a successfully applied route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteAddedBody {
    pub message: String,
    pub file: String,
}

/// Liveness body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthBody {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}
