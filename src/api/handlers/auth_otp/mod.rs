//! Email OTP registration and password reset endpoints.
//!
//! Every endpoint forwards to the [`OtpService`](crate::otp::OtpService) held in
//! an `Extension` and maps the outcome the same way:
//!
//! - `Ok(value)` → `200` with the value as JSON.
//! - `OtpError::InvalidInput(message)` → `400 {"message": message}`.
//! - anything else → [`ServerError`], a logged `500`.
//!
//! Bodies that fail to parse on endpoints with a required body are also `400`
//! with the rejection text as `message`.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::api::error::{bad_request, ServerError};
use crate::otp::{OtpError, OtpResult};

pub(crate) mod password;
pub(crate) mod register;
pub(crate) mod types;


/// Default mount point of the OTP routes.
pub const BASE_PATH: &str = "/api/auth/otp";

pub(crate) fn respond<T: Serialize>(outcome: OtpResult<T>) -> Result<Response, ServerError> {
    match outcome {
        Ok(body) => Ok(Json(body).into_response()),
        Err(OtpError::InvalidInput(message)) => {
            debug!(message = %message, "otp request rejected");
            Ok(bad_request(message))
        }
        Err(err) => Err(err.into()),
    }
}
