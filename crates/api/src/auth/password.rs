//! Stored password credentials.
//!
//! Account passwords are kept as Argon2id PHC strings (`$argon2id$v=19$...`),
//! so the parameters and salt travel with each hash and older hashes keep
//! verifying after [`hasher`] is retuned.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// Failure to produce or read a stored credential. A wrong password is not an
/// error; [`verify_password`] returns `Ok(false)` for it.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),

    /// The stored value is not a PHC string this service can read.
    #[error("stored password hash is unreadable: {0}")]
    Corrupt(argon2::password_hash::Error),
}

/// The Argon2id instance used for new hashes.
fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

/// Hash an account password for storage.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(PasswordError::Hash)
}

/// Check `password` against a stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored_hash).map_err(PasswordError::Corrupt)?;
    match hasher().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Corrupt(e)),
    }
}
