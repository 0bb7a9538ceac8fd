//! Input checks shared by the OTP flows.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::sync::OnceLock;

use super::{OtpError, OtpResult};

pub(crate) const MIN_PASSWORD_LENGTH: usize = 6;
pub(crate) const MIN_FULL_NAME_LENGTH: usize = 2;

/// Normalize an email for lookup/uniqueness checks.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub(crate) fn valid_email(email_normalized: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
        .is_some_and(|regex| regex.is_match(email_normalized))
}

/// Require a present, well-formed email and return it normalized.
pub(crate) fn require_email(email: Option<&str>) -> OtpResult<String> {
    let email = email.map(normalize_email).unwrap_or_default();
    if email.is_empty() {
        return Err(OtpError::invalid("Email is required"));
    }
    if !valid_email(&email) {
        return Err(OtpError::invalid("Invalid email address"));
    }
    Ok(email)
}

pub(crate) fn require_code(code: Option<&str>) -> OtpResult<&str> {
    match code.map(str::trim) {
        Some(code) if !code.is_empty() => Ok(code),
        _ => Err(OtpError::invalid("Code is required")),
    }
}

pub(crate) fn require_password(password: Option<SecretString>) -> OtpResult<SecretString> {
    let password = password.ok_or_else(|| OtpError::invalid("Password is required"))?;
    if password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(OtpError::invalid(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(password)
}

pub(crate) fn require_full_name(full_name: Option<&str>) -> OtpResult<String> {
    let full_name = full_name.map(str::trim).unwrap_or_default();
    if full_name.chars().count() < MIN_FULL_NAME_LENGTH {
        return Err(OtpError::invalid(format!(
            "Full name must be at least {MIN_FULL_NAME_LENGTH} characters"
        )));
    }
    Ok(full_name.to_string())
}

/// The acting account, when known, may only act on itself.
pub(crate) fn require_same_actor(email: &str, actor_email: Option<&str>) -> OtpResult<()> {
    match actor_email.map(normalize_email) {
        Some(actor) if !actor.is_empty() && actor != email => Err(OtpError::invalid(
            "Email does not match the requesting account",
        )),
        _ => Ok(()),
    }
}
