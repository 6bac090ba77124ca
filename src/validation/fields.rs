//! Template, domain and gateway port checks.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Templates accepted by the lifecycle script's `config --template`.
pub const ALLOWED_TEMPLATES: [&str; 2] = ["pa-default", "pa-admin"];

/// Lowest gateway port a PA may bind.
pub const MIN_GATEWAY_PORT: u16 = 3001;
/// Highest gateway port a PA may bind.
pub const MAX_GATEWAY_PORT: u16 = 3100;

static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9.-]+\.[a-z]{2,}$").expect("domain pattern is valid")
});

/// A PA configuration template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Default,
    Admin,
}

impl Template {
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        match raw {
            Some("pa-default") => Ok(Self::Default),
            Some("pa-admin") => Ok(Self::Admin),
            other => Err(format!(
                "Invalid template: must be one of {} (got: {})",
                ALLOWED_TEMPLATES.join(", "),
                other.unwrap_or("null")
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "pa-default",
            Self::Admin => "pa-admin",
        }
    }
}

/// A hostname accepted for a reverse-proxy site block.
///
/// Only syntax is checked; the name is never resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain(String);

impl Domain {
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        match raw {
            Some(domain) if DOMAIN_RE.is_match(domain) => Ok(Self(domain.to_string())),
            other => Err(format!("Invalid domain: {}", other.unwrap_or("null"))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A gateway port in `[MIN_GATEWAY_PORT, MAX_GATEWAY_PORT]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayPort(u16);

impl GatewayPort {
    /// Accepts a JSON integer or a decimal string.
    pub fn parse(raw: Option<&Value>) -> Result<Self, String> {
        let candidate = match raw {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
            _ => None,
        };

        match candidate
            .and_then(|port| u16::try_from(port).ok())
            .filter(|port| (MIN_GATEWAY_PORT..=MAX_GATEWAY_PORT).contains(port))
        {
            Some(port) => Ok(Self(port)),
            None => Err(format!(
                "Invalid gateway_port: must be {MIN_GATEWAY_PORT}-{MAX_GATEWAY_PORT} (got: {})",
                display_raw(raw)
            )),
        }
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for GatewayPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn display_raw(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_templates() {
        assert_eq!(Template::parse(Some("pa-default")), Ok(Template::Default));
        assert_eq!(Template::parse(Some("pa-admin")).unwrap().as_str(), "pa-admin");
        let err = Template::parse(Some("pa-root")).unwrap_err();
        assert_eq!(
            err,
            "Invalid template: must be one of pa-default, pa-admin (got: pa-root)"
        );
    }

    #[test]
    fn test_domains() {
        for ok in ["example.com", "pa.alice.example.org", "a-b.io", "x1.co"] {
            assert!(Domain::parse(Some(ok)).is_ok(), "{ok} should be accepted");
        }
        for bad in [
            "Example.com",
            "example",
            "example.c",
            "example.c0m",
            "exa mple.com",
            "example.com\n}",
            "example.com;",
            "",
        ] {
            assert!(Domain::parse(Some(bad)).is_err(), "{bad:?} should be rejected");
        }
        assert_eq!(Domain::parse(None).unwrap_err(), "Invalid domain: null");
    }

    #[test]
    fn test_port_boundaries() {
        assert!(GatewayPort::parse(Some(&json!(3000))).is_err());
        assert_eq!(GatewayPort::parse(Some(&json!(3001))).unwrap().get(), 3001);
        assert_eq!(GatewayPort::parse(Some(&json!(3100))).unwrap().get(), 3100);
        assert!(GatewayPort::parse(Some(&json!(3101))).is_err());
    }

    #[test]
    fn test_port_forms() {
        assert_eq!(GatewayPort::parse(Some(&json!("3050"))).unwrap().get(), 3050);
        assert!(GatewayPort::parse(Some(&json!("abc"))).is_err());
        assert!(GatewayPort::parse(Some(&json!(-3050))).is_err());
        assert!(GatewayPort::parse(Some(&json!(3050.5))).is_err());
        // Values that would wrap into range as a u16.
        assert!(GatewayPort::parse(Some(&json!(3001 + 65_536))).is_err());
        assert!(GatewayPort::parse(Some(&json!("68636"))).is_err());
        assert!(GatewayPort::parse(Some(&json!(null))).is_err());
        assert!(GatewayPort::parse(None).is_err());

        let err = GatewayPort::parse(Some(&json!(3000))).unwrap_err();
        assert_eq!(err, "Invalid gateway_port: must be 3001-3100 (got: 3000)");
    }
}
