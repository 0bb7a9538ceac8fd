//! Request/response types for the OTP endpoints.
//!
//! `RegisterRequest` and the collaborator results live in [`crate::otp`]
//! because the service consumes and produces them directly.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::otp::optional_secret;

/// Both fields are required; any other keys in the body are ignored.
#[derive(ToSchema, Deserialize, Debug)]
pub struct VerifyRegisterRequest {
    pub email: String,
    pub code: String,
}

#[derive(ToSchema, Deserialize, Debug, Default)]
pub struct ForgotPasswordStartRequest {
    pub email: Option<String>,
}

#[derive(ToSchema, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordCompleteRequest {
    pub email: Option<String>,
    pub code: Option<String>,
    #[serde(default, deserialize_with = "optional_secret")]
    #[schema(value_type = Option<String>, format = Password)]
    pub new_password: Option<SecretString>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct CompleteResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use secrecy::ExposeSecret;
    use serde_json::json;

    #[test]
    fn verify_request_ignores_extra_keys() -> Result<()> {
        let request: VerifyRegisterRequest = serde_json::from_value(json!({
            "email": "a@b.com",
            "code": "123456",
            "fullName": "ignored"
        }))?;
        assert_eq!(request.email, "a@b.com");
        assert_eq!(request.code, "123456");
        Ok(())
    }

    #[test]
    fn verify_request_requires_both_fields() {
        let missing_code = serde_json::from_value::<VerifyRegisterRequest>(json!({"email": "a@b.com"}));
        assert!(missing_code.is_err());
        let missing_email = serde_json::from_value::<VerifyRegisterRequest>(json!({"code": "1"}));
        assert!(missing_email.is_err());
    }

    #[test]
    fn complete_request_reads_new_password() -> Result<()> {
        let request: ForgotPasswordCompleteRequest = serde_json::from_value(json!({
            "email": "a@b.com",
            "code": "123456",
            "newPassword": "s3cret!"
        }))?;
        assert_eq!(
            request.new_password.as_ref().map(ExposeSecret::expose_secret),
            Some("s3cret!")
        );
        let empty: ForgotPasswordCompleteRequest = serde_json::from_value(json!({}))?;
        assert!(empty.email.is_none() && empty.code.is_none() && empty.new_password.is_none());
        Ok(())
    }
}
