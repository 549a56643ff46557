use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use uuid::Uuid;

use crate::error::{Result, UserError};

/// One-way argon2id hash, returned as a PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    // 16 random bytes from a v4 uuid are enough salt and avoid pulling in an RNG.
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| UserError::PasswordHash(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

/// Returns false for a wrong password and for an unparseable stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
