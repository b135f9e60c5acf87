//! Random identifiers for session tokens and stored file names.

use base64::Engine as _;
use serde_json::json;

use crate::error::AppError;

/// Length of random bytes behind a session token.
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Returns `len` random bytes encoded as URL-safe base64 without padding.
///
/// Uses `getrandom` for entropy.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
pub fn random_token(len: usize) -> Result<String, AppError> {
    let mut buffer = vec![0u8; len];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate random bytes",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}
