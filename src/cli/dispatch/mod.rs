//! Map parsed CLI arguments to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{otp, ARG_BASE_PATH, ARG_FRONTEND_URL, ARG_PORT};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if the OTP arguments are inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let base_path = matches
        .get_one::<String>(ARG_BASE_PATH)
        .cloned()
        .unwrap_or_else(|| crate::api::handlers::auth_otp::BASE_PATH.to_string());
    let frontend_url = matches
        .get_one::<String>(ARG_FRONTEND_URL)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    let otp_opts = otp::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        base_path,
        frontend_url,
        otp_ttl_seconds: otp_opts.ttl_seconds,
        otp_max_attempts: otp_opts.max_attempts,
        dev_codes: otp_opts.dev_codes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    const ENV: [(&str, Option<&str>); 6] = [
        ("OTPGATE_PORT", None),
        ("OTPGATE_BASE_PATH", None),
        ("OTPGATE_FRONTEND_URL", None),
        ("OTPGATE_OTP_TTL_SECONDS", None),
        ("OTPGATE_OTP_MAX_ATTEMPTS", None),
        ("OTPGATE_DEV_CODES", None),
    ];

    #[test]
    fn handler_builds_server_args() {
        temp_env::with_vars(ENV, || {
            let matches = commands::new().get_matches_from(vec![
                "otpgate",
                "--port",
                "8081",
                "--frontend-url",
                "http://localhost:5173",
                "--dev-codes",
            ]);
            let Ok(Action::Server(args)) = handler(&matches) else {
                panic!("expected server action");
            };
            assert_eq!(args.port, 8081);
            assert_eq!(args.base_path, "/api/auth/otp");
            assert_eq!(args.frontend_url.as_deref(), Some("http://localhost:5173"));
            assert_eq!(args.otp_ttl_seconds, 300);
            assert_eq!(args.otp_max_attempts, 5);
            assert!(args.dev_codes);
        });
    }

    #[test]
    fn blank_frontend_url_disables_cors() {
        temp_env::with_vars(ENV, || {
            let matches =
                commands::new().get_matches_from(vec!["otpgate", "--frontend-url", "  "]);
            let Ok(Action::Server(args)) = handler(&matches) else {
                panic!("expected server action");
            };
            assert_eq!(args.frontend_url, None);
        });
    }

    #[test]
    fn zero_ttl_fails_dispatch() {
        temp_env::with_vars(ENV, || {
            let matches =
                commands::new().get_matches_from(vec!["otpgate", "--otp-ttl-seconds", "0"]);
            assert!(handler(&matches).is_err());
        });
    }
}
