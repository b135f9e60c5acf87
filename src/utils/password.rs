//! Password hashing with argon2id.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$...`), so parameters and
//! salt travel with the hash.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use serde_json::json;

use crate::error::AppError;

const SALT_BYTES: usize = 16;

/// Hashes `password` with a fresh random salt.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system RNG or the hasher fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let mut salt_bytes = [0u8; SALT_BYTES];
    getrandom::fill(&mut salt_bytes).map_err(|e| {
        AppError::internal("Failed to generate salt", json!({ "reason": e.to_string() }))
    })?;

    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| {
        AppError::internal("Failed to encode salt", json!({ "reason": e.to_string() }))
    })?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            AppError::internal("Failed to hash password", json!({ "reason": e.to_string() }))
        })
}

/// Returns true if `password` matches the stored PHC `hash`.
///
/// Malformed hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("secret123", &hash));
        assert!(!verify_password("secret124", &hash));
    }

    #[test]
    fn test_same_password_different_salts() {
        let a = hash_password("secret123").unwrap();
        let b = hash_password("secret123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!verify_password("secret123", "not-a-phc-string"));
        assert!(!verify_password("", ""));
    }
}
