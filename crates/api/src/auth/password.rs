//! Argon2id password hashing and verification.
//!
//! Hashes use the PHC string format so algorithm parameters and salt are
//! embedded in the hash itself. The operator hash is generated once with
//! the `agency-hash-password` binary (see [`hash_operator_password`]) and
//! stored in `ADMIN_PASSWORD_HASH`.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
/// A malformed stored hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Shortest operator password `agency-hash-password` accepts.
pub const MIN_OPERATOR_PASSWORD_LENGTH: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum PasswordSetupError {
    #[error("password must be at least {MIN_OPERATOR_PASSWORD_LENGTH} characters")]
    TooShort,

    #[error("hashing failed: {0}")]
    Hash(String),
}

/// Turn one line typed by the operator into an `ADMIN_PASSWORD_HASH` value.
///
/// Only the line ending is stripped; surrounding spaces are part of the
/// password.
pub fn hash_operator_password(line: &str) -> Result<String, PasswordSetupError> {
    let password = line.trim_end_matches(['\r', '\n']);
    if password.chars().count() < MIN_OPERATOR_PASSWORD_LENGTH {
        return Err(PasswordSetupError::TooShort);
    }
    hash_password(password).map_err(|e| PasswordSetupError::Hash(e.to_string()))
}
