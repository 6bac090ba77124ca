//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (loopback only)
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, body field access)
//!     → [security: bearer auth]
//!     → [routing: route table lookup]
//!     → [security: bounded body read]
//!     → handlers.rs (validate, run script / write site file)
//!     → response.rs (JSON success or error body)
//!     → [observability: access log line]
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestId, X_REQUEST_ID};
pub use response::{ApiError, ErrorBody};
pub use server::{ApiServer, AppState};
