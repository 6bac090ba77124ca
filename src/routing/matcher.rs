//! Path matching logic.
//!
//! # Responsibilities
//! - Match exact paths (case-sensitive)
//! - Match `<prefix><identity>` and extract the identity
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - The identity tail is checked against the PA name syntax at match time;
//!   a tail that could never be a name means the route does not match

use crate::validation::is_pa_name;

/// How a route matches a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatcher {
    /// The path must equal this string.
    Exact(&'static str),
    /// The path must be this prefix followed by a valid PA name.
    Identity { prefix: &'static str },
}

/// Result of a successful path match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatch {
    Exact,
    Identity(String),
}

impl PathMatcher {
    pub fn matches(&self, path: &str) -> Option<PathMatch> {
        match self {
            Self::Exact(expected) => (path == *expected).then_some(PathMatch::Exact),
            Self::Identity { prefix } => path
                .strip_prefix(prefix)
                .filter(|tail| is_pa_name(tail))
                .map(|tail| PathMatch::Identity(tail.to_string())),
        }
    }
}
