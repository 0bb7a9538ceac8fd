use utoipa::OpenApi;

use super::error::ErrorMessage;
use super::handlers::auth_otp::{password, register, types};
use super::handlers::health;
use crate::otp::{OtpChallenge, RegisterRequest, RegisterVerified, Role};

/// Where Swagger UI and the raw document are served.
pub const DOCS_PATH: &str = "/docs";
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Paths are documented under the default `/api/auth/otp` mount point.
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        register::start_register,
        register::verify_register,
        password::start_forgot_password,
        password::complete_forgot_password,
    ),
    components(schemas(
        health::Health,
        ErrorMessage,
        RegisterRequest,
        OtpChallenge,
        RegisterVerified,
        Role,
        types::VerifyRegisterRequest,
        types::ForgotPasswordStartRequest,
        types::ForgotPasswordCompleteRequest,
        types::CompleteResponse,
    )),
    tags(
        (name = "auth-otp", description = "Email OTP registration and password reset"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
