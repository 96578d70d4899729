//! Account password hashing with Argon2id.
//!
//! Hashes are stored as PHC strings in the `users.password_hash` column. Login checks run
//! the same Argon2 work whether or not the username exists; see [`credentials_match`].

use crate::errors::{Error, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::LazyLock;
use tracing::warn;

/// Hash verified against when the username is unknown.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("innovation-points-dummy").ok());

/// Hashes `password` into a PHC string with a fresh salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash {
            message: format!("Failed to hash password: {e}"),
        })
}

/// Checks `password` against a stored PHC hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| Error::PasswordHash {
        message: format!("Stored password hash is unreadable: {e}"),
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Login check that costs one verification either way.
///
/// With no stored hash (unknown username) `verify` still runs against a fixed dummy
/// hash and the result is discarded. An unreadable stored hash counts as a mismatch.
pub fn credentials_match<F>(stored_hash: Option<&str>, password: &str, verify: F) -> bool
where
    F: Fn(&str, &str) -> Result<bool>,
{
    let Some(hash) = stored_hash else {
        if let Some(dummy) = DUMMY_HASH.as_deref() {
            let _ = verify(password, dummy);
        }
        return false;
    };

    match verify(password, hash) {
        Ok(matched) => matched,
        Err(e) => {
            warn!("{e}");
            false
        }
    }
}
