//! Forgotten password: issue a reset code, then set a new password with it.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    response::Response,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use super::respond;
use super::types::{CompleteResponse, ForgotPasswordCompleteRequest, ForgotPasswordStartRequest};
use crate::api::error::{bad_request, ErrorMessage, ServerError};
use crate::otp::{OtpChallenge, OtpService};

/// The body is optional; without one the email is forwarded as absent.
#[utoipa::path(
    post,
    path = "/api/auth/otp/password/forgot/start",
    request_body(content = ForgotPasswordStartRequest, description = "May be omitted"),
    responses(
        (status = 200, description = "Reset code issued", body = OtpChallenge),
        (status = 400, description = "Missing or unknown email", body = ErrorMessage),
        (status = 500, description = "Unexpected failure", body = ErrorMessage)
    ),
    tag = "auth-otp"
)]
#[instrument(skip_all)]
pub async fn start_forgot_password(
    service: Extension<Arc<dyn OtpService>>,
    payload: Option<Json<ForgotPasswordStartRequest>>,
) -> Result<Response, ServerError> {
    let email = payload.and_then(|Json(request)| request.email);

    // The requester is the account owner in the public flow.
    respond(
        service
            .start_password_change(email.as_deref(), email.as_deref())
            .await,
    )
}

#[utoipa::path(
    post,
    path = "/api/auth/otp/password/forgot/complete",
    request_body = ForgotPasswordCompleteRequest,
    responses(
        (status = 200, description = "Password changed", body = CompleteResponse),
        (status = 400, description = "Missing fields, or invalid/expired code", body = ErrorMessage),
        (status = 500, description = "Unexpected failure", body = ErrorMessage)
    ),
    tag = "auth-otp"
)]
#[instrument(skip_all)]
pub async fn complete_forgot_password(
    service: Extension<Arc<dyn OtpService>>,
    payload: Result<Json<ForgotPasswordCompleteRequest>, JsonRejection>,
) -> Result<Response, ServerError> {
    let ForgotPasswordCompleteRequest {
        email,
        code,
        new_password,
    } = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return Ok(bad_request(rejection.body_text())),
    };

    let outcome = service
        .complete_password_change(
            email.as_deref(),
            code.as_deref(),
            new_password,
            email.as_deref(),
        )
        .await;

    // Whatever the service returns on success, callers only see the flag.
    respond(outcome.map(|()| CompleteResponse { success: true }))
}
