use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::engine::cost::QuoteError;
use crate::engine::lifecycle::TransitionError;
use crate::store::ConcurrentModification;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    ConcurrentModification(#[from] ConcurrentModification),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Transition(err) => (transition_status(err), err.to_string()),
            AppError::Quote(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::ConcurrentModification(err) => (StatusCode::CONFLICT, err.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

fn transition_status(err: &TransitionError) -> StatusCode {
    match err {
        TransitionError::MissingActor | TransitionError::MissingLocation => {
            StatusCode::BAD_REQUEST
        }
        TransitionError::InvalidTransition { .. }
        | TransitionError::TerminalState(_)
        | TransitionError::NotReadyForConfirmation(_) => StatusCode::CONFLICT,
    }
}
