//! Site file persistence and proxy reload.
//!
//! # Responsibilities
//! - Write `<sites_dir>/<name>.<ext>`, creating the directory if needed
//! - Reload the reverse proxy after a successful write
//! - Report write failures and reload failures as distinct errors
//!
//! # Design Decisions
//! - Files are replaced wholesale; there are no partial edits
//! - The file name is a pure function of the validated PA name
//! - No reload is attempted when the write fails

use std::path::PathBuf;
use std::time::Duration;

use crate::caddy::site::render_site;
use crate::config::ProxyConfig;
use crate::process::ProcessInvoker;
use crate::validation::{Domain, GatewayPort, PaName};

/// A site file that was written and applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    pub domain: String,
    pub port: u16,
    pub file: PathBuf,
}

/// Failure while persisting or applying a site file.
#[derive(Debug, thiserror::Error)]
pub enum RouteWriteError {
    /// Nothing was reloaded; the file may not exist.
    #[error("Failed to write Caddy config: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is on disk but the proxy is not serving it yet.
    #[error("Caddy config written but reload failed: {detail}")]
    Reload { path: PathBuf, detail: String },
}

/// Writes per-PA site files and reloads the proxy.
#[derive(Debug, Clone)]
pub struct RouteConfigWriter {
    config: ProxyConfig,
    invoker: ProcessInvoker,
}

impl RouteConfigWriter {
    pub fn new(config: ProxyConfig, invoker: ProcessInvoker) -> Self {
        Self { config, invoker }
    }

    /// Proxy binary used for reloads.
    pub fn binary(&self) -> &str {
        &self.config.binary
    }

    /// Path of the site file for `name`.
    pub fn site_path(&self, name: &PaName) -> PathBuf {
        PathBuf::from(&self.config.sites_dir)
            .join(format!("{}.{}", name.as_str(), self.config.site_extension))
    }

    /// Render, write and apply the route for `name`.
    pub async fn add_route(
        &self,
        name: &PaName,
        domain: &Domain,
        port: GatewayPort,
    ) -> Result<RouteRecord, RouteWriteError> {
        let path = self.site_path(name);
        let contents = render_site(
            domain,
            port,
            &self.config.trusted_ranges,
            &self.config.stripped_headers,
        );

        if let Err(source) = self.write_site(&path, contents.as_bytes()).await {
            tracing::error!(path = %path.display(), error = %source, "Failed to write site file");
            return Err(RouteWriteError::Write { path, source });
        }
        tracing::info!(path = %path.display(), domain = %domain, port = port.get(), "Site file written");

        self.reload().await.map_err(|detail| {
            tracing::error!(path = %path.display(), detail = %detail, "Proxy reload failed");
            RouteWriteError::Reload {
                path: path.clone(),
                detail,
            }
        })?;

        Ok(RouteRecord {
            domain: domain.to_string(),
            port: port.get(),
            file: path,
        })
    }

    async fn write_site(&self, path: &std::path::Path, contents: &[u8]) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.config.sites_dir).await?;
        tokio::fs::write(path, contents).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644)).await?;
        }

        Ok(())
    }

    /// Run `<binary> reload --config <config_file>`.
    pub async fn reload(&self) -> Result<(), String> {
        let result = self
            .invoker
            .run(
                &self.config.binary,
                ["reload", "--config", self.config.config_file.as_str()],
                Duration::from_millis(self.config.reload_timeout_ms),
            )
            .await;

        if result.ok {
            Ok(())
        } else {
            Err(result.error_message())
        }
    }
}
