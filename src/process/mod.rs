//! External process subsystem.
//!
//! # Data Flow
//! ```text
//! handler
//!     → lifecycle.rs (build argv for create/config/start/... )
//!     → invoker.rs (spawn without a shell, enforce timeout)
//!     → CommandResult { ok, stdout, stderr, exit_code }
//! ```
//!
//! # Design Decisions
//! - Argument vectors only; caller input is never part of a command string
//! - Two timeout classes: default (30s) and extended (120s, create)
//! - `ok` requires both a successful launch and a zero exit

pub mod invoker;
pub mod lifecycle;

pub use invoker::{CommandResult, ProcessInvoker};
pub use lifecycle::{ConfigOptions, CreateOptions, LifecycleScript, TimeoutClass, Transition};
