//! Registration: issue a code, then trade it for an account.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    response::Response,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use super::respond;
use super::types::VerifyRegisterRequest;
use crate::api::error::{bad_request, ErrorMessage, ServerError};
use crate::otp::{OtpChallenge, OtpService, RegisterRequest, RegisterVerified};

#[utoipa::path(
    post,
    path = "/api/auth/otp/register/start",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Verification code issued", body = OtpChallenge),
        (status = 400, description = "Invalid registration data", body = ErrorMessage),
        (status = 500, description = "Unexpected failure", body = ErrorMessage)
    ),
    tag = "auth-otp"
)]
#[instrument(skip_all)]
pub async fn start_register(
    service: Extension<Arc<dyn OtpService>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response, ServerError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return Ok(bad_request(rejection.body_text())),
    };

    respond(service.start_register(request).await)
}

#[utoipa::path(
    post,
    path = "/api/auth/otp/register/verify",
    request_body = VerifyRegisterRequest,
    responses(
        (status = 200, description = "Registration completed", body = RegisterVerified),
        (status = 400, description = "Missing fields, or invalid/expired code", body = ErrorMessage),
        (status = 500, description = "Unexpected failure", body = ErrorMessage)
    ),
    tag = "auth-otp"
)]
#[instrument(skip_all)]
pub async fn verify_register(
    service: Extension<Arc<dyn OtpService>>,
    payload: Result<Json<VerifyRegisterRequest>, JsonRejection>,
) -> Result<Response, ServerError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return Ok(bad_request(rejection.body_text())),
    };

    let email = request.email.trim();
    let code = request.code.trim();
    if email.is_empty() || code.is_empty() {
        return Ok(bad_request("Email and code are required"));
    }

    respond(service.verify_register(email, code).await)
}
