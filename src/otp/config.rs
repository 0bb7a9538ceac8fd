use std::time::Duration;

const DEFAULT_CODE_TTL_SECONDS: u64 = 5 * 60;
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

#[derive(Clone, Copy, Debug)]
pub struct OtpConfig {
    code_ttl_seconds: u64,
    max_attempts: u32,
    dev_codes: bool,
}

impl OtpConfig {
    /// Default config: codes live 5 minutes, 5 wrong guesses burn a code,
    /// and plain codes are never echoed back.
    #[must_use]
    pub fn new() -> Self {
        Self {
            code_ttl_seconds: DEFAULT_CODE_TTL_SECONDS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            dev_codes: false,
        }
    }

    #[must_use]
    pub fn with_code_ttl_seconds(mut self, seconds: u64) -> Self {
        self.code_ttl_seconds = seconds;
        self
    }

    /// Zero is clamped to one attempt.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    #[must_use]
    pub fn with_dev_codes(mut self, enabled: bool) -> Self {
        self.dev_codes = enabled;
        self
    }

    #[must_use]
    pub fn code_ttl(&self) -> Duration {
        Duration::from_secs(self.code_ttl_seconds)
    }

    #[must_use]
    pub fn code_ttl_seconds(&self) -> u64 {
        self.code_ttl_seconds
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub fn dev_codes(&self) -> bool {
        self.dev_codes
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_config_defaults_and_overrides() {
        let config = OtpConfig::new();
        assert_eq!(config.code_ttl_seconds(), DEFAULT_CODE_TTL_SECONDS);
        assert_eq!(config.code_ttl(), Duration::from_secs(300));
        assert_eq!(config.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert!(!config.dev_codes());

        let config = config
            .with_code_ttl_seconds(60)
            .with_max_attempts(3)
            .with_dev_codes(true);
        assert_eq!(config.code_ttl_seconds(), 60);
        assert_eq!(config.max_attempts(), 3);
        assert!(config.dev_codes());
    }

    #[test]
    fn otp_config_clamps_zero_attempts() {
        assert_eq!(OtpConfig::new().with_max_attempts(0).max_attempts(), 1);
    }
}
