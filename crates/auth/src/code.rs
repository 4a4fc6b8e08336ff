//! Email verification codes.
//!
//! Opaque 32-character alphanumeric strings, unique per account while it is
//! pending. The code stays on the row after verification so repeat checks
//! can answer "already verified" instead of erroring.
use cardbox_core::VERIFICATION_CODE_LENGTH;

/// Generates a fresh verification code.
pub fn generate() -> String {
    use rand::Rng;
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(VERIFICATION_CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// Shape check performed before any database access. Wrong length or
/// non-alphanumeric content is a validation error, not a lookup miss.
pub fn wellformed(code: &str) -> bool {
    code.len() == VERIFICATION_CODE_LENGTH && code.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_wellformed() {
        for _ in 0..64 {
            assert!(wellformed(&generate()));
        }
    }

    #[test]
    fn generated_codes_are_distinct() {
        assert_ne!(generate(), generate());
    }

    #[test]
    fn malformed_codes_are_rejected() {
        assert!(!wellformed(""));
        assert!(!wellformed("short"));
        assert!(!wellformed(&"a".repeat(33)));
        assert!(!wellformed(&"!".repeat(32)));
    }
}
