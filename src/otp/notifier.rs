//! Hand-off point for issued codes.
//!
//! The service never delivers email itself. A `CodeNotifier` receives each
//! fresh code and decides what to do with it. `LogCodeNotifier` is the local
//! dev notifier: it records that a code was issued and only prints the code
//! at debug level.

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodePurpose {
    Registration,
    PasswordReset,
}

impl CodePurpose {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::PasswordReset => "password_reset",
        }
    }
}

impl fmt::Display for CodePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CodeNotice<'a> {
    pub email: &'a str,
    pub purpose: CodePurpose,
    pub code: &'a str,
}

#[async_trait]
pub trait CodeNotifier: Send + Sync {
    /// Pass the code on, or fail so the issuing call is rolled back.
    async fn notify(&self, notice: &CodeNotice<'_>) -> Result<()>;
}

#[derive(Clone, Debug, Default)]
pub struct LogCodeNotifier;

#[async_trait]
impl CodeNotifier for LogCodeNotifier {
    async fn notify(&self, notice: &CodeNotice<'_>) -> Result<()> {
        info!(
            email = %notice.email,
            purpose = %notice.purpose,
            "otp code issued"
        );
        debug!(email = %notice.email, code = %notice.code, "otp code value");
        Ok(())
    }
}
