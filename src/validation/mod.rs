//! Input validation.
//!
//! Pure functions, one per field kind. Each returns the validated value or a
//! human-readable message that handlers surface verbatim as a 400. Nothing
//! here performs I/O.

pub mod fields;
pub mod identity;

pub use fields::{Domain, GatewayPort, Template};
pub use identity::{is_pa_name, PaName, PA_NAME_PATTERN};
