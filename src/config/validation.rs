//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Refuse to start without a bearer token
//! - Keep the listener on loopback
//! - Validate value ranges (timeouts > 0, body cap > 0, ports valid)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ApiConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::{IpAddr, SocketAddr};

use crate::config::schema::ApiConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &ApiConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.auth.token.is_empty() {
        errors.push(ValidationError::new(
            "auth.token",
            "PROVISION_API_TOKEN not set. Generate with: openssl rand -hex 16",
        ));
    }

    match config.listener.host.parse::<IpAddr>() {
        Ok(ip) if ip.is_loopback() => {}
        Ok(ip) => errors.push(ValidationError::new(
            "listener.host",
            format!("{ip} is not a loopback address"),
        )),
        Err(_) => errors.push(ValidationError::new(
            "listener.host",
            format!("{:?} is not an IP address", config.listener.host),
        )),
    }

    if config.listener.port == 0 {
        errors.push(ValidationError::new("listener.port", "must be non-zero"));
    }

    if config.lifecycle.script.is_empty() {
        errors.push(ValidationError::new("lifecycle.script", "must not be empty"));
    }
    if config.lifecycle.interpreter.is_empty() {
        errors.push(ValidationError::new("lifecycle.interpreter", "must not be empty"));
    }
    if config.lifecycle.default_timeout_ms == 0 {
        errors.push(ValidationError::new("lifecycle.default_timeout_ms", "must be > 0"));
    }
    if config.lifecycle.create_timeout_ms == 0 {
        errors.push(ValidationError::new("lifecycle.create_timeout_ms", "must be > 0"));
    }

    if config.proxy.binary.is_empty() {
        errors.push(ValidationError::new("proxy.binary", "must not be empty"));
    }
    if config.proxy.sites_dir.is_empty() {
        errors.push(ValidationError::new("proxy.sites_dir", "must not be empty"));
    }
    let ext = &config.proxy.site_extension;
    if ext.is_empty() || ext.contains('/') || ext.contains('\\') || ext.contains("..") {
        errors.push(ValidationError::new(
            "proxy.site_extension",
            format!("{ext:?} is not a plain file extension"),
        ));
    }
    if config.proxy.reload_timeout_ms == 0 {
        errors.push(ValidationError::new("proxy.reload_timeout_ms", "must be > 0"));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::new("limits.max_body_bytes", "must be > 0"));
    }

    let obs = &config.observability;
    if !matches!(obs.log_format.as_str(), "text" | "json") {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("expected \"text\" or \"json\", got {:?}", obs.log_format),
        ));
    }
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("{:?} is not a socket address", obs.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
