//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the dispatcher and middleware
//! - Wire up middleware (request ID, access log, panic guard, auth)
//! - Bind server to listener
//! - Dispatch requests through the route table to handlers
//!
//! # Middleware order (outermost first)
//! ```text
//! trace → request id → access log → catch panic → bearer auth → dispatch
//! ```

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::caddy::RouteConfigWriter;
use crate::config::ApiConfig;
use crate::http::handlers;
use crate::http::request::{request_id_middleware, RequestParams};
use crate::http::response::ApiError;
use crate::observability::logging::access_log_middleware;
use crate::process::{LifecycleScript, ProcessInvoker};
use crate::routing::{Endpoint, Router as RouteTable};
use crate::security::{bearer_auth_middleware, read_json_body, BearerAuth};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<RouteTable>,
    pub auth: Arc<BearerAuth>,
    pub lifecycle: Arc<LifecycleScript>,
    pub routes: Arc<RouteConfigWriter>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn from_config(config: &ApiConfig) -> Self {
        let invoker = ProcessInvoker::new();
        Self {
            router: Arc::new(RouteTable::standard()),
            auth: Arc::new(BearerAuth::new(config.auth.token.clone())),
            lifecycle: Arc::new(LifecycleScript::new(config.lifecycle.clone(), invoker)),
            routes: Arc::new(RouteConfigWriter::new(config.proxy.clone(), invoker)),
            max_body_bytes: config.limits.max_body_bytes,
        }
    }
}

/// HTTP server for the provisioning API.
pub struct ApiServer {
    router: Router,
    state: AppState,
}

impl ApiServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ApiConfig) -> Self {
        let state = AppState::from_config(&config);
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(dispatch)
            .layer(middleware::from_fn_with_state(
                state.clone(),
                bearer_auth_middleware,
            ))
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(middleware::from_fn(access_log_middleware))
            .layer(middleware::from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// The assembled router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            pactl = %self.state.lifecycle.script(),
            caddy = %self.state.routes.binary(),
            auth = %format!("bearer token ({} chars)", self.state.auth.token_len()),
            "Provisioning API listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolve the route, read the body if the route takes one, run the handler.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();

    let Some(matched) = state.router.match_request(&parts.method, parts.uri.path()) else {
        tracing::debug!(method = %parts.method, path = %parts.uri.path(), "No route matched");
        return ApiError::NotFound.into_response();
    };

    let params = if takes_body(matched.endpoint) {
        match read_json_body(body, state.max_body_bytes).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(path = %parts.uri.path(), error = %e, "Rejected request body");
                return ApiError::from(e).into_response();
            }
        }
    } else {
        Value::Object(Default::default())
    };

    let mut response = match handlers::handle(&state, &matched, &params).await {
        Ok(response) => response,
        Err(e) => {
            if e.status().is_server_error() {
                tracing::error!(endpoint = ?matched.endpoint, error = %e, "Request failed");
            }
            e.into_response()
        }
    };

    if takes_body(matched.endpoint) {
        response.extensions_mut().insert(RequestParams(params));
    }
    response
}

fn takes_body(endpoint: Endpoint) -> bool {
    matches!(
        endpoint,
        Endpoint::PaCreate
            | Endpoint::PaConfig
            | Endpoint::PaStart
            | Endpoint::PaStop
            | Endpoint::PaRestart
            | Endpoint::CaddyAddRoute
    )
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Internal server error".to_string()
    };
    tracing::error!(error = %message, "Handler panicked");
    ApiError::Internal(message).into_response()
}
