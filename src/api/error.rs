//! Catch-all response for failures handlers do not map themselves.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::otp::OtpError;

/// Body of every non-2xx JSON response.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage {
    pub message: String,
}

impl ErrorMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 400 with `{"message": ...}`.
pub fn bad_request(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorMessage::new(message))).into_response()
}

/// An error that escaped a handler. Details are logged, never returned.
#[derive(Debug)]
pub struct ServerError(anyhow::Error);

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl From<OtpError> for ServerError {
    fn from(err: OtpError) -> Self {
        match err {
            OtpError::Internal(inner) => Self(inner),
            other => Self(anyhow::Error::new(other)),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        error!("Unhandled request error: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorMessage::new("Internal server error")),
        )
            .into_response()
    }
}
