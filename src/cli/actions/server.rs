use crate::{
    api::{self, ServerConfig},
    cli::telemetry,
    otp::{InMemoryOtpService, LogCodeNotifier, OtpConfig},
};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub base_path: String,
    pub frontend_url: Option<String>,
    pub otp_ttl_seconds: u64,
    pub otp_max_attempts: u32,
    pub dev_codes: bool,
}

impl Args {
    fn otp_config(&self) -> OtpConfig {
        OtpConfig::new()
            .with_code_ttl_seconds(self.otp_ttl_seconds)
            .with_max_attempts(self.otp_max_attempts)
            .with_dev_codes(self.dev_codes)
    }

    fn server_config(&self) -> ServerConfig {
        ServerConfig::new()
            .with_base_path(&self.base_path)
            .with_frontend_base_url(self.frontend_url.clone())
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the router cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let otp_config = args.otp_config();
    if otp_config.dev_codes() {
        warn!("dev codes enabled: issued codes are returned in API responses");
    }
    debug!(
        ttl_seconds = otp_config.code_ttl_seconds(),
        max_attempts = otp_config.max_attempts(),
        "otp config"
    );

    let service = Arc::new(InMemoryOtpService::new(
        otp_config,
        Arc::new(LogCodeNotifier),
    ));

    let result = api::new(args.port, args.server_config(), service).await;

    telemetry::shutdown_tracer();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args {
            port: 8080,
            base_path: "otp/".to_string(),
            frontend_url: Some("http://localhost:3000".to_string()),
            otp_ttl_seconds: 60,
            otp_max_attempts: 0,
            dev_codes: true,
        }
    }

    #[test]
    fn otp_config_from_args() {
        let config = args().otp_config();
        assert_eq!(config.code_ttl_seconds(), 60);
        assert_eq!(config.max_attempts(), 1);
        assert!(config.dev_codes());
    }

    #[test]
    fn server_config_from_args() {
        let config = args().server_config();
        assert_eq!(config.base_path(), "/otp");
        assert_eq!(config.frontend_base_url(), Some("http://localhost:3000"));
    }
}
