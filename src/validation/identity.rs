//! PA identity (name) syntax.
//!
//! A name is used both as a lifecycle-script argument and as a file name in
//! the site directory, so the character class alone must rule out path
//! separators, dots and shell metacharacters.

use std::sync::LazyLock;

use regex::Regex;

/// Pattern every PA name must match.
pub const PA_NAME_PATTERN: &str = r"^[a-z][a-z0-9-]{1,30}$";

static PA_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PA_NAME_PATTERN).expect("PA name pattern is valid"));

/// Returns true if `candidate` is a syntactically valid PA name.
pub fn is_pa_name(candidate: &str) -> bool {
    PA_NAME_RE.is_match(candidate)
}

/// A validated PA name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaName(String);

impl PaName {
    /// Validate a raw, possibly absent, name.
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        match raw {
            Some(name) if is_pa_name(name) => Ok(Self(name.to_string())),
            other => Err(format!(
                "Invalid PA name: must match {PA_NAME_PATTERN} (got: {})",
                other.unwrap_or("null")
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PaName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
