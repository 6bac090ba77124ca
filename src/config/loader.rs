//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ApiConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid environment variable {name}: {value:?}")]
    Env { name: &'static str, value: String },
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values given on the command line. They win over the file and the
/// environment and are validated like any other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
}

/// Load configuration from an optional TOML file and the process environment.
pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<ApiConfig, ConfigError> {
    load_with_env(path, overrides, |name| std::env::var(name).ok())
}

/// Load configuration with an explicit environment lookup.
///
/// File values are applied first, then environment overrides, then
/// command-line overrides, then the result is validated.
pub fn load_with_env<F>(
    path: Option<&Path>,
    overrides: &Overrides,
    env: F,
) -> Result<ApiConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ApiConfig::default(),
    };

    apply_env(&mut config, env)?;
    if let Some(port) = overrides.port {
        config.listener.port = port;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn apply_env<F>(config: &mut ApiConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = env("PROVISION_API_PORT") {
        config.listener.port = port.trim().parse().map_err(|_| ConfigError::Env {
            name: "PROVISION_API_PORT",
            value: port.clone(),
        })?;
    }
    if let Some(token) = env("PROVISION_API_TOKEN") {
        config.auth.token = token;
    }
    if let Some(script) = env("PACTL_PATH") {
        config.lifecycle.script = script;
    }
    if let Some(dir) = env("CADDY_CONFIG_DIR") {
        config.proxy.sites_dir = dir;
    }
    if let Some(bin) = env("CADDY_BIN") {
        config.proxy.binary = bin;
    }
    if let Some(file) = env("CADDYFILE") {
        config.proxy.config_file = file;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_only() {
        let config = load_with_env(
            None,
            &Overrides::default(),
            env_from(&[
                ("PROVISION_API_TOKEN", "abc123"),
                ("PROVISION_API_PORT", "9200"),
                ("PACTL_PATH", "/tmp/pactl.sh"),
                ("CADDY_CONFIG_DIR", "/tmp/sites"),
                ("CADDY_BIN", "/usr/bin/caddy"),
                ("CADDYFILE", "/etc/Caddyfile"),
            ]),
        )
        .unwrap();

        assert_eq!(config.auth.token, "abc123");
        assert_eq!(config.listener.port, 9200);
        assert_eq!(config.lifecycle.script, "/tmp/pactl.sh");
        assert_eq!(config.proxy.sites_dir, "/tmp/sites");
        assert_eq!(config.proxy.binary, "/usr/bin/caddy");
        assert_eq!(config.proxy.config_file, "/etc/Caddyfile");
    }

    #[test]
    fn test_missing_token_refuses_to_load() {
        let err = load_with_env(None, &Overrides::default(), env_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("auth.token"));
    }

    #[test]
    fn test_non_numeric_port() {
        let err = load_with_env(
            None,
            &Overrides::default(),
            env_from(&[("PROVISION_API_TOKEN", "t"), ("PROVISION_API_PORT", "nine")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Env { name: "PROVISION_API_PORT", .. }));
    }

    #[test]
    fn test_file_then_env_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[listener]
port = 9300

[auth]
token = "from-file"

[proxy]
sites_dir = "/srv/sites"
"#
        )
        .unwrap();

        let config = load_with_env(
            Some(file.path()),
            &Overrides::default(),
            env_from(&[("PROVISION_API_TOKEN", "from-env")]),
        )
        .unwrap();

        assert_eq!(config.listener.port, 9300);
        assert_eq!(config.auth.token, "from-env");
        assert_eq!(config.proxy.sites_dir, "/srv/sites");
        assert_eq!(config.proxy.site_extension, "caddy");
    }

    #[test]
    fn test_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener\nport = ").unwrap();
        let err = load_with_env(Some(file.path()), &Overrides::default(), env_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_cli_port_wins_and_is_validated() {
        let env = env_from(&[("PROVISION_API_TOKEN", "t"), ("PROVISION_API_PORT", "9200")]);
        let config = load_with_env(None, &Overrides { port: Some(9400) }, &env).unwrap();
        assert_eq!(config.listener.port, 9400);

        let err = load_with_env(None, &Overrides { port: Some(0) }, &env).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("listener.port"));
    }
}
