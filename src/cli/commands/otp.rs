use clap::{builder::BoolishValueParser, Arg, ArgAction, ArgMatches, Command};

pub const ARG_OTP_TTL_SECONDS: &str = "otp-ttl-seconds";
pub const ARG_OTP_MAX_ATTEMPTS: &str = "otp-max-attempts";
pub const ARG_DEV_CODES: &str = "dev-codes";

#[derive(Debug)]
pub struct Options {
    pub ttl_seconds: u64,
    pub max_attempts: u32,
    pub dev_codes: bool,
}

impl Options {
    /// Parse OTP arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the code lifetime is zero.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let ttl_seconds = matches
            .get_one::<u64>(ARG_OTP_TTL_SECONDS)
            .copied()
            .unwrap_or(300);
        if ttl_seconds == 0 {
            anyhow::bail!("--{ARG_OTP_TTL_SECONDS} must be greater than zero");
        }

        Ok(Self {
            ttl_seconds,
            max_attempts: matches
                .get_one::<u32>(ARG_OTP_MAX_ATTEMPTS)
                .copied()
                .unwrap_or(5),
            dev_codes: matches.get_flag(ARG_DEV_CODES),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_OTP_TTL_SECONDS)
                .long(ARG_OTP_TTL_SECONDS)
                .help("Lifetime of an issued code in seconds")
                .env("OTPGATE_OTP_TTL_SECONDS")
                .default_value("300")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_OTP_MAX_ATTEMPTS)
                .long(ARG_OTP_MAX_ATTEMPTS)
                .help("Wrong guesses allowed before a code is burned")
                .env("OTPGATE_OTP_MAX_ATTEMPTS")
                .default_value("5")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new(ARG_DEV_CODES)
                .long(ARG_DEV_CODES)
                .help("Echo issued codes in responses (development only)")
                .env("OTPGATE_DEV_CODES")
                .action(ArgAction::SetTrue)
                .value_parser(BoolishValueParser::new()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    const OTP_ENV: [(&str, Option<&str>); 3] = [
        ("OTPGATE_OTP_TTL_SECONDS", None),
        ("OTPGATE_OTP_MAX_ATTEMPTS", None),
        ("OTPGATE_DEV_CODES", None),
    ];

    #[test]
    fn defaults() {
        temp_env::with_vars(OTP_ENV, || {
            let matches = with_args(Command::new("otpgate")).get_matches_from(vec!["otpgate"]);
            let options = Options::parse(&matches).expect("defaults parse");
            assert_eq!(options.ttl_seconds, 300);
            assert_eq!(options.max_attempts, 5);
            assert!(!options.dev_codes);
        });
    }

    #[test]
    fn flags_override_defaults() {
        temp_env::with_vars(OTP_ENV, || {
            let matches = with_args(Command::new("otpgate")).get_matches_from(vec![
                "otpgate",
                "--otp-ttl-seconds",
                "60",
                "--otp-max-attempts",
                "3",
                "--dev-codes",
            ]);
            let options = Options::parse(&matches).expect("flags parse");
            assert_eq!(options.ttl_seconds, 60);
            assert_eq!(options.max_attempts, 3);
            assert!(options.dev_codes);
        });
    }

    #[test]
    fn env_vars_are_read() {
        temp_env::with_vars(
            [
                ("OTPGATE_OTP_TTL_SECONDS", Some("120")),
                ("OTPGATE_OTP_MAX_ATTEMPTS", Some("2")),
                ("OTPGATE_DEV_CODES", Some("true")),
            ],
            || {
                let matches =
                    with_args(Command::new("otpgate")).get_matches_from(vec!["otpgate"]);
                let options = Options::parse(&matches).expect("env parse");
                assert_eq!(options.ttl_seconds, 120);
                assert_eq!(options.max_attempts, 2);
                assert!(options.dev_codes);
            },
        );
    }

    #[test]
    fn zero_max_attempts_is_rejected() {
        temp_env::with_vars(OTP_ENV, || {
            let result = with_args(Command::new("otpgate")).try_get_matches_from(vec![
                "otpgate",
                "--otp-max-attempts",
                "0",
            ]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn zero_ttl_is_rejected() {
        temp_env::with_vars(OTP_ENV, || {
            let matches = with_args(Command::new("otpgate"))
                .get_matches_from(vec!["otpgate", "--otp-ttl-seconds", "0"]);
            assert!(Options::parse(&matches).is_err());
        });
    }
}
