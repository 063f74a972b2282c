use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use engine::{ActionOutcome, ActionResult, ActionState, EngineError, FailureKind, auth::AuthError};

use serde::Serialize;
pub use cache::PageCache;
pub use server::{ServerState, router, run_with_listener};

mod auth;
mod cache;
mod customers;
mod invoices;
mod server;

pub enum ServerError {
    Engine(EngineError),
    Action(ActionState),
    Auth(AuthError),
    Render(serde_json::Error),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::MissingField(_) | EngineError::Hashing(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

fn status_for_action_state(state: &ActionState) -> StatusCode {
    match state.kind {
        FailureKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        FailureKind::Database => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ServerError::Action(state) => {
                return (status_for_action_state(&state), Json(state)).into_response();
            }
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Auth(err) => {
                tracing::error!("authentication failed: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
            ServerError::Render(err) => {
                tracing::error!("failed to render response: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<ActionState> for ServerError {
    fn from(value: ActionState) -> Self {
        Self::Action(value)
    }
}

impl From<AuthError> for ServerError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(value: serde_json::Error) -> Self {
        Self::Render(value)
    }
}

/// Turns a command result into what the browser should see next.
fn action_response(result: ActionResult) -> Result<Response, ServerError> {
    match result? {
        ActionOutcome::Redirect(path) => Ok(Redirect::to(&path).into_response()),
        ActionOutcome::Revalidated => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
