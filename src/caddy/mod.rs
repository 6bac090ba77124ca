//! Reverse-proxy route configuration.
//!
//! # Data Flow
//! ```text
//! validated (name, domain, port)
//!     → site.rs (render site block)
//!     → writer.rs (write <sites_dir>/<name>.caddy)
//!     → writer.rs (caddy reload --config <Caddyfile>)
//!     → RouteRecord | RouteWriteError::{Write, Reload}
//! ```

pub mod site;
pub mod writer;

pub use site::render_site;
pub use writer::{RouteConfigWriter, RouteRecord, RouteWriteError};
