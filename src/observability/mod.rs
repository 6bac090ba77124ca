//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every request:
//!     → logging.rs (one access line, redacted body)
//!     → metrics.rs (counters, histograms)
//!
//! Every subprocess:
//!     → metrics.rs (outcome counter)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON optional) for machine parsing
//! - Request ID flows from the request-id middleware into the access line
//! - Secrets are masked before formatting, never after

pub mod logging;
pub mod metrics;
