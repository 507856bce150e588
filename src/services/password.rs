//! Password hashing module
//!
//! Salted PBKDF2-HMAC-SHA512 with a per-account salt stored alongside the
//! hash. The derivation is deliberately slow (10,000 rounds) to resist
//! offline brute force, and verification compares in constant time so a
//! mismatch reveals nothing about how many prefix bytes matched.

use rand::rngs::SysRng;
use rand::TryRng;
use sha2::Sha512;

/// Salt byte length before hex encoding (16 bytes = 128-bit entropy).
const SALT_BYTES: usize = 16;

/// PBKDF2 iteration count.
const HASH_ITERATIONS: u32 = 10_000;

/// Derived key length in bytes (128 hex chars once encoded).
const HASH_BYTES: usize = 64;

/// Generate a fresh random salt, hex-encoded.
///
/// Every account gets its own salt at creation time; salts are never reused
/// across accounts or across password changes.
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    SysRng
        .try_fill_bytes(&mut bytes)
        .expect("OS RNG failed to produce salt bytes");
    hex::encode(bytes)
}

/// Derive the hex-encoded hash for a password and salt.
///
/// Deterministic: identical inputs always produce identical output.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut derived = [0u8; HASH_BYTES];
    pbkdf2::pbkdf2_hmac::<Sha512>(
        password.as_bytes(),
        salt.as_bytes(),
        HASH_ITERATIONS,
        &mut derived,
    );
    hex::encode(derived)
}

/// Verify a password against a stored hash and salt.
pub fn verify_password(password: &str, expected_hash: &str, salt: &str) -> bool {
    let candidate = hash_password(password, salt);
    constant_time_eq(candidate.as_bytes(), expected_hash.as_bytes())
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let salt = generate_salt();
        assert_eq!(hash_password("secret", &salt), hash_password("secret", &salt));
    }

    #[test]
    fn test_different_passwords_produce_different_hashes() {
        let salt = generate_salt();
        assert_ne!(hash_password("secret", &salt), hash_password("Secret", &salt));
    }

    #[test]
    fn test_salt_matters() {
        let hash = hash_password("secret", "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        assert!(!verify_password("secret", &hash, "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"));
    }

    #[test]
    fn test_verify_roundtrip() {
        let salt = generate_salt();
        let hash = hash_password("correct horse battery staple", &salt);
        assert!(verify_password("correct horse battery staple", &hash, &salt));
        assert!(!verify_password("wrong", &hash, &salt));
    }

    #[test]
    fn test_salts_are_unique_and_hex() {
        let first = generate_salt();
        let second = generate_salt();
        assert_ne!(first, second);
        assert_eq!(first.len(), SALT_BYTES * 2);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_has_expected_width() {
        let hash = hash_password("secret", &generate_salt());
        assert_eq!(hash.len(), HASH_BYTES * 2);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_does_not_contain_password() {
        let hash = hash_password("plaintext-password", &generate_salt());
        assert!(!hash.contains("plaintext-password"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"short", b"longer"));
    }

    #[test]
    fn test_empty_and_unicode_passwords() {
        let salt = generate_salt();
        let empty = hash_password("", &salt);
        assert!(verify_password("", &empty, &salt));

        let unicode = hash_password("パスワード🔐", &salt);
        assert!(verify_password("パスワード🔐", &unicode, &salt));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// For any password and salt, hashing twice yields the same output
        /// and the roundtrip verifies.
        #[test]
        fn property_hash_roundtrip(
            password in "[a-zA-Z0-9!@#$%^&*]{0,40}",
            salt in "[0-9a-f]{32}"
        ) {
            let hash = hash_password(&password, &salt);
            prop_assert_eq!(&hash, &hash_password(&password, &salt));
            prop_assert!(verify_password(&password, &hash, &salt));
        }

        /// Any modification to the password fails verification.
        #[test]
        fn property_modified_password_fails(
            password in "[a-zA-Z0-9]{1,30}",
            salt in "[0-9a-f]{32}"
        ) {
            let hash = hash_password(&password, &salt);
            let wrong = format!("{}x", password);
            prop_assert!(!verify_password(&wrong, &hash, &salt));
        }

        /// The same password under a different salt fails verification.
        #[test]
        fn property_different_salt_fails(
            password in "[a-zA-Z0-9]{1,30}",
            salt_a in "[0-9a-f]{32}",
            salt_b in "[0-9a-f]{32}"
        ) {
            prop_assume!(salt_a != salt_b);
            let hash = hash_password(&password, &salt_a);
            prop_assert!(!verify_password(&password, &hash, &salt_b));
        }
    }
}
