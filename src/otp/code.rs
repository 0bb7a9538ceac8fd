//! Numeric OTP codes. Only hashes are kept server-side.

use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use sha2::{Digest, Sha256};

pub const CODE_LENGTH: usize = 6;
const CODE_SPACE: u32 = 1_000_000;

/// Draw a zero-padded 6-digit code from the OS RNG.
#[must_use]
pub fn generate_code() -> String {
    let value = OsRng.gen_range(0..CODE_SPACE);
    format!("{value:0width$}", width = CODE_LENGTH)
}

/// Hash a code bound to the email it was issued for.
#[must_use]
pub fn hash_code(email: &str, code: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(b":");
    hasher.update(code.trim().as_bytes());
    hasher.finalize().to_vec()
}

#[must_use]
pub fn code_matches(expected_hash: &[u8], email: &str, code: &str) -> bool {
    constant_time_eq(expected_hash, &hash_code(email, code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..64 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()), "{code}");
        }
    }

    #[test]
    fn hash_is_bound_to_email() {
        let first = hash_code("a@example.com", "123456");
        assert_eq!(first, hash_code("a@example.com", "123456"));
        assert_ne!(first, hash_code("b@example.com", "123456"));
        assert_ne!(first, hash_code("a@example.com", "654321"));
    }

    #[test]
    fn code_matches_ignores_surrounding_whitespace() {
        let hash = hash_code("a@example.com", "042042");
        assert!(code_matches(&hash, "a@example.com", " 042042 "));
        assert!(!code_matches(&hash, "a@example.com", "042043"));
    }
}
