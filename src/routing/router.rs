//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the route table as data: (method, path matcher, endpoint)
//! - Look up the matching endpoint for a request
//! - Return matched endpoint or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in table order; first match wins
//! - Explicit NoMatch rather than silent default

use axum::http::Method;

use crate::routing::matcher::{PathMatch, PathMatcher};

/// Operation a route resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Health,
    PaCreate,
    PaConfig,
    PaStart,
    PaStop,
    PaRestart,
    PaList,
    PaStatus,
    CaddyAddRoute,
}

impl Endpoint {
    /// Endpoints reachable without a bearer token.
    pub fn is_public(self) -> bool {
        matches!(self, Self::Health)
    }
}

/// One row of the route table.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub matcher: PathMatcher,
    pub endpoint: Endpoint,
}

impl Route {
    fn new(method: Method, matcher: PathMatcher, endpoint: Endpoint) -> Self {
        Self {
            method,
            matcher,
            endpoint,
        }
    }
}

/// A resolved request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub endpoint: Endpoint,
    /// PA name captured from the path, if the route has one.
    pub param: Option<String>,
}

/// Outcome of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Matched(RouteMatch),
    NoMatch,
}

/// The route table.
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The API's route table.
    pub fn standard() -> Self {
        use Endpoint::*;
        use PathMatcher::{Exact, Identity};

        Self::new(vec![
            Route::new(Method::GET, Exact("/health"), Health),
            Route::new(Method::POST, Exact("/pa/create"), PaCreate),
            Route::new(Method::POST, Exact("/pa/config"), PaConfig),
            Route::new(Method::POST, Exact("/pa/start"), PaStart),
            Route::new(Method::POST, Exact("/pa/stop"), PaStop),
            Route::new(Method::POST, Exact("/pa/restart"), PaRestart),
            Route::new(Method::GET, Exact("/pa/list"), PaList),
            Route::new(Method::GET, Identity { prefix: "/pa/status/" }, PaStatus),
            Route::new(Method::POST, Exact("/caddy/add-route"), CaddyAddRoute),
        ])
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Resolve `(method, path)` to exactly one endpoint or `NoMatch`.
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution {
        for route in self.routes.iter().filter(|r| r.method == *method) {
            if let Some(found) = route.matcher.matches(path) {
                let param = match found {
                    PathMatch::Exact => None,
                    PathMatch::Identity(name) => Some(name),
                };
                return Resolution::Matched(RouteMatch {
                    endpoint: route.endpoint,
                    param,
                });
            }
        }
        Resolution::NoMatch
    }

    /// Convenience wrapper returning `Option`.
    pub fn match_request(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        match self.resolve(method, path) {
            Resolution::Matched(m) => Some(m),
            Resolution::NoMatch => None,
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::standard()
    }
}
