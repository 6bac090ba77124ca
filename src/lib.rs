//! Least-privilege provisioning API.
//!
//! Authenticated HTTP front end that turns validated requests into lifecycle
//! script invocations and reverse-proxy site files.

pub mod caddy;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod process;
pub mod routing;
pub mod security;
pub mod validation;

pub use config::schema::ApiConfig;
pub use http::ApiServer;
pub use lifecycle::Shutdown;
