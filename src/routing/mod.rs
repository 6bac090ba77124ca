//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (route table scan)
//!     → matcher.rs (exact path or /pa/status/<name>)
//!     → Return: Matched { endpoint, param } or NoMatch
//! ```
//!
//! # Design Decisions
//! - Routes are data, built once at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - Total: every request resolves to one endpoint or NoMatch (404)

pub mod matcher;
pub mod router;

pub use matcher::{PathMatch, PathMatcher};
pub use router::{Endpoint, Resolution, Route, RouteMatch, Router};
