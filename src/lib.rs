//! # Otpgate (email OTP registration and password reset)
//!
//! `otpgate` exposes a small HTTP API that lets a client register an account
//! and reset a forgotten password by proving control of an email address with
//! a short-lived one-time code.
//!
//! ## Flows
//!
//! - **Registration:** `register/start` records the pending account and sends
//!   a 6-digit code; `register/verify` consumes the code and creates the
//!   account. Verification does not log the user in.
//! - **Password reset:** `password/forgot/start` sends a code to a known
//!   account; `password/forgot/complete` consumes it and replaces the password.
//!
//! The router in [`api`] only extracts payloads and maps outcomes to HTTP
//! responses. All decisions live behind the [`otp::OtpService`] trait, with
//! [`otp::InMemoryOtpService`] as the bundled implementation.
//!
//! ## Errors
//!
//! Validation failures come back as `400 {"message": ...}`. Anything else is
//! logged and answered with a generic `500`.

pub mod api;
pub mod cli;
pub mod otp;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
