pub mod logging;
pub mod otp;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";
pub const ARG_BASE_PATH: &str = "base-path";
pub const ARG_FRONTEND_URL: &str = "frontend-url";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("otpgate")
        .about("Email OTP registration and password reset")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("8080")
                .env("OTPGATE_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_BASE_PATH)
                .long(ARG_BASE_PATH)
                .help("Path the OTP routes are mounted under")
                .default_value(crate::api::handlers::auth_otp::BASE_PATH)
                .env("OTPGATE_BASE_PATH"),
        )
        .arg(
            Arg::new(ARG_FRONTEND_URL)
                .long(ARG_FRONTEND_URL)
                .help("Frontend URL allowed to call the API from a browser (enables CORS)")
                .env("OTPGATE_FRONTEND_URL"),
        );

    let command = otp::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVER_ENV: [(&str, Option<&str>); 3] = [
        ("OTPGATE_PORT", None),
        ("OTPGATE_BASE_PATH", None),
        ("OTPGATE_FRONTEND_URL", None),
    ];

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "otpgate");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Email OTP registration and password reset".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(SERVER_ENV, || {
            let matches = new().get_matches_from(vec!["otpgate"]);

            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(8080));
            assert_eq!(
                matches.get_one::<String>(ARG_BASE_PATH).cloned(),
                Some("/api/auth/otp".to_string())
            );
            assert_eq!(matches.get_one::<String>(ARG_FRONTEND_URL), None);
        });
    }

    #[test]
    fn test_check_port_and_paths() {
        temp_env::with_vars(SERVER_ENV, || {
            let matches = new().get_matches_from(vec![
                "otpgate",
                "--port",
                "9090",
                "--base-path",
                "/otp",
                "--frontend-url",
                "http://localhost:3000",
            ]);

            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(9090));
            assert_eq!(
                matches.get_one::<String>(ARG_BASE_PATH).cloned(),
                Some("/otp".to_string())
            );
            assert_eq!(
                matches.get_one::<String>(ARG_FRONTEND_URL).cloned(),
                Some("http://localhost:3000".to_string())
            );
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("OTPGATE_PORT", Some("443")),
                ("OTPGATE_BASE_PATH", Some("/auth")),
                ("OTPGATE_FRONTEND_URL", Some("https://app.example.com")),
            ],
            || {
                let matches = new().get_matches_from(vec!["otpgate"]);

                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>(ARG_BASE_PATH).cloned(),
                    Some("/auth".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(ARG_FRONTEND_URL).cloned(),
                    Some("https://app.example.com".to_string())
                );
            },
        );
    }

    #[test]
    fn test_invalid_port() {
        temp_env::with_vars(SERVER_ENV, || {
            let result = new().try_get_matches_from(vec!["otpgate", "--port", "70000"]);
            assert!(result.is_err());
        });
    }
}
