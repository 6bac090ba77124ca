//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the API.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::security::DEFAULT_MAX_BODY_BYTES;

/// Root configuration for the provisioning API.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ApiConfig {
    /// Listener configuration (loopback host and port).
    pub listener: ListenerConfig,

    /// Bearer token authentication.
    pub auth: AuthConfig,

    /// Lifecycle script invocation.
    pub lifecycle: LifecycleConfig,

    /// Reverse-proxy site files and reload command.
    pub proxy: ProxyConfig,

    /// Request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind host. Must be a loopback address.
    pub host: String,

    /// Bind port.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9100,
        }
    }
}

/// Bearer token configuration.
#[derive(Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Pre-shared secret expected in `Authorization: Bearer <token>`.
    pub token: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &format_args!("<{} chars>", self.token.len()))
            .finish()
    }
}

/// Lifecycle script configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Interpreter the script is handed to (e.g. `bash`).
    pub interpreter: String,

    /// Path to the lifecycle script.
    pub script: String,

    /// Timeout for status, list, config and start/stop/restart in milliseconds.
    pub default_timeout_ms: u64,

    /// Timeout for create, which may pull a container image.
    pub create_timeout_ms: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            interpreter: "bash".to_string(),
            script: "/opt/mypa/scripts/pactl.sh".to_string(),
            default_timeout_ms: 30_000,
            create_timeout_ms: 120_000,
        }
    }
}

/// Reverse-proxy (Caddy) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Path to the reverse-proxy binary.
    pub binary: String,

    /// Main config file passed to `reload --config`.
    pub config_file: String,

    /// Directory holding one site file per PA.
    pub sites_dir: String,

    /// Extension of site files (without the dot).
    pub site_extension: String,

    /// Reload command timeout in milliseconds.
    pub reload_timeout_ms: u64,

    /// Source ranges allowed to keep identity headers.
    pub trusted_ranges: Vec<String>,

    /// Identity headers stripped from untrusted traffic.
    pub stripped_headers: Vec<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            binary: "/opt/mypa/caddy".to_string(),
            config_file: "/opt/mypa/Caddyfile".to_string(),
            sites_dir: "/opt/mypa/caddy/sites".to_string(),
            site_extension: "caddy".to_string(),
            reload_timeout_ms: 30_000,
            trusted_ranges: vec!["100.64.0.0/10".to_string(), "127.0.0.1".to_string()],
            stripped_headers: vec![
                "Tailscale-User-Login".to_string(),
                "Tailscale-User-Name".to_string(),
                "Tailscale-User-Profile-Pic".to_string(),
            ],
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format: `text` or `json`.
    pub log_format: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9190".to_string(),
        }
    }
}
