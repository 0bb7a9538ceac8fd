//! Email one-time-password flows.
//!
//! The HTTP layer only talks to an [`OtpService`]. Implementations own code
//! issuance, expiry, single-use enforcement and password changes, and report
//! user mistakes as [`OtpError::InvalidInput`]. Anything else is an
//! [`OtpError::Internal`] and surfaces as a 500.
//!
//! [`memory::InMemoryOtpService`] is the implementation wired into the binary.
//! It keeps accounts and pending codes in process memory and hands codes to a
//! [`notifier::CodeNotifier`] for delivery.

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

pub mod code;
pub mod config;
pub mod memory;
pub mod notifier;
pub(crate) mod password;
mod types;
pub(crate) mod validation;

pub use config::OtpConfig;
pub use memory::InMemoryOtpService;
pub use notifier::{CodeNotice, CodeNotifier, CodePurpose, LogCodeNotifier};
pub(crate) use types::optional_secret;
pub use types::{OtpChallenge, RegisterRequest, RegisterVerified, Role};

#[derive(Debug, Error)]
pub enum OtpError {
    /// The request was malformed or semantically invalid; the message is shown to the caller.
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl OtpError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

pub type OtpResult<T> = Result<T, OtpError>;

/// Collaborator behind the `/api/auth/otp` endpoints.
///
/// Optional arguments mirror what the client may omit; implementations decide
/// whether absence is an error. `actor_email` is the address acting on the
/// account and, for the public reset flow, is the same as `email`.
#[async_trait]
pub trait OtpService: Send + Sync {
    async fn start_register(&self, request: RegisterRequest) -> OtpResult<OtpChallenge>;

    async fn verify_register(&self, email: &str, code: &str) -> OtpResult<RegisterVerified>;

    async fn start_password_change(
        &self,
        email: Option<&str>,
        actor_email: Option<&str>,
    ) -> OtpResult<OtpChallenge>;

    async fn complete_password_change(
        &self,
        email: Option<&str>,
        code: Option<&str>,
        new_password: Option<SecretString>,
        actor_email: Option<&str>,
    ) -> OtpResult<()>;
}
