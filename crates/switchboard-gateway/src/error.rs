//! Error types for the gateway API.
//!
//! [`GatewayError`] unifies all failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use switchboard_directory::DirectoryError;

/// Errors that can occur in the gateway API layer.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request collides with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The request was understood but the current state cannot serve it.
    #[error("unprocessable: {0}")]
    Unprocessable(String),

    /// The request body or path was malformed.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<DirectoryError> for GatewayError {
    fn from(err: DirectoryError) -> Self {
        let message = err.to_string();
        match err {
            DirectoryError::PhoneNotFound(_) => Self::NotFound(message),
            DirectoryError::DuplicatePhone(_) | DirectoryError::SimulationAlreadyLoaded(_) => {
                Self::Conflict(message)
            }
            DirectoryError::Unpositioned(_)
            | DirectoryError::UnknownSimulation(_)
            | DirectoryError::UnknownPanel { .. }
            | DirectoryError::FixedWithoutLocation(_)
            | DirectoryError::FixedPhone(_)
            | DirectoryError::Topology { .. } => Self::Unprocessable(message),
            DirectoryError::EmptyPhoneId => Self::BadRequest(message),
        }
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
