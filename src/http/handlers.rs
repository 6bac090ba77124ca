//! Endpoint handlers.
//!
//! Each handler validates its inputs in a fixed order and returns on the
//! first failure before any subprocess or file work starts.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::http::request::RequestBody;
use crate::http::response::{ApiError, HealthBody, MessageBody, OutputBody, RouteAddedBody};
use crate::http::server::AppState;
use crate::process::{CommandResult, ConfigOptions, CreateOptions, Transition};
use crate::routing::{Endpoint, RouteMatch};
use crate::validation::{Domain, GatewayPort, PaName, Template};

/// Service name reported by `/health`.
pub const SERVICE_NAME: &str = "mypa-provisioning-api";

/// Run the handler for a matched route.
pub async fn handle(
    state: &AppState,
    matched: &RouteMatch,
    body: &Value,
) -> Result<Response, ApiError> {
    let body = RequestBody::new(body);
    match matched.endpoint {
        Endpoint::Health => Ok(health()),
        Endpoint::PaCreate => create(state, body).await,
        Endpoint::PaConfig => configure(state, body).await,
        Endpoint::PaStart => transition(state, body, Transition::Start).await,
        Endpoint::PaStop => transition(state, body, Transition::Stop).await,
        Endpoint::PaRestart => transition(state, body, Transition::Restart).await,
        Endpoint::PaList => list(state).await,
        Endpoint::PaStatus => status(state, matched.param.as_deref()).await,
        Endpoint::CaddyAddRoute => add_route(state, body).await,
    }
}

fn health() -> Response {
    Json(HealthBody {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
    .into_response()
}

fn name_from(body: RequestBody<'_>) -> Result<PaName, ApiError> {
    PaName::parse(body.str("name")).map_err(ApiError::Validation)
}

fn require_ok(result: CommandResult) -> Result<CommandResult, ApiError> {
    if result.ok {
        Ok(result)
    } else {
        Err(ApiError::Execution(result.error_message()))
    }
}

async fn create(state: &AppState, body: RequestBody<'_>) -> Result<Response, ApiError> {
    let name = name_from(body)?;
    let opts = CreateOptions {
        member: body.optional_text("member"),
        team: body.optional_text("team"),
    };

    let result = require_ok(state.lifecycle.create(&name, &opts).await)?;
    tracing::info!(pa = %name, "PA created");
    Ok((
        StatusCode::CREATED,
        Json(MessageBody {
            message: format!("PA {name} created"),
            output: result.stdout,
        }),
    )
        .into_response())
}

async fn configure(state: &AppState, body: RequestBody<'_>) -> Result<Response, ApiError> {
    let name = name_from(body)?;
    let template = if body.is_set("template") {
        let raw = body.get("template").map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
        Some(Template::parse(raw.as_deref()).map_err(ApiError::Validation)?)
    } else {
        None
    };
    let opts = ConfigOptions {
        template,
        gateway_token: body.optional_text("gateway_token"),
    };

    let result = require_ok(state.lifecycle.configure(&name, &opts).await)?;
    tracing::info!(pa = %name, template = ?template.map(Template::as_str), "PA configured");
    Ok(Json(MessageBody {
        message: format!("PA {name} configured"),
        output: result.stdout,
    })
    .into_response())
}

async fn transition(
    state: &AppState,
    body: RequestBody<'_>,
    transition: Transition,
) -> Result<Response, ApiError> {
    let name = name_from(body)?;
    let result = require_ok(state.lifecycle.transition(&name, transition).await)?;
    tracing::info!(pa = %name, action = transition.verb(), "PA transition complete");
    Ok(Json(MessageBody {
        message: format!("PA {name} {}", transition.past_tense()),
        output: result.stdout,
    })
    .into_response())
}

async fn list(state: &AppState) -> Result<Response, ApiError> {
    let result = require_ok(state.lifecycle.list().await)?;
    Ok(Json(OutputBody {
        output: result.stdout,
    })
    .into_response())
}

async fn status(state: &AppState, param: Option<&str>) -> Result<Response, ApiError> {
    let name = PaName::parse(param).map_err(ApiError::Validation)?;
    let result = require_ok(state.lifecycle.status(&name).await)?;
    Ok(Json(OutputBody {
        output: result.stdout,
    })
    .into_response())
}

async fn add_route(state: &AppState, body: RequestBody<'_>) -> Result<Response, ApiError> {
    let name = name_from(body)?;
    let domain = Domain::parse(body.str("domain")).map_err(ApiError::Validation)?;
    let port = GatewayPort::parse(body.get("gateway_port")).map_err(ApiError::Validation)?;

    let record = state.routes.add_route(&name, &domain, port).await?;
    tracing::info!(pa = %name, domain = %domain, port = port.get(), "Route added");
    Ok(Json(RouteAddedBody {
        message: format!("Route added: {} → 127.0.0.1:{}", record.domain, record.port),
        file: record.file.display().to_string(),
    })
    .into_response())
}
