//! argon2id password hashes in PHC string form.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use super::error::AuthError;

fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

/// Hash `password` with a fresh random salt.
pub fn hash(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(hasher().hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Check `password` against a stored hash.
///
/// A mismatch is `Ok(false)`; only an unreadable stored hash is an error.
/// Parameters embedded in the hash win over the local defaults, so hashes
/// written with older settings keep verifying.
pub fn verify(password: &str, stored: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored)?;
    match hasher().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Hash of a random secret nobody knows. Verifying against it costs the same
/// as a real check, which keeps unknown usernames from answering faster.
pub fn decoy() -> Result<String, AuthError> {
    let mut secret = [0u8; 16];
    OsRng.fill_bytes(&mut secret);
    hash(&hex::encode(secret))
}
