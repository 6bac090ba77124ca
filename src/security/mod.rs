//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → auth.rs (bearer token, constant-time compare; /health exempt)
//!     → routing
//!     → limits.rs (bounded body read for POST routes)
//!     → handler
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - No trust in client input
//! - 401 responses carry no detail

pub mod auth;
pub mod limits;

pub use auth::{bearer_auth_middleware, constant_time_eq, BearerAuth};
pub use limits::{read_json_body, PayloadError, DEFAULT_MAX_BODY_BYTES};
