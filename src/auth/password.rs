use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use error_stack::{Result, ResultExt};
use once_cell::sync::Lazy;
use thiserror::Error;

static CONTEXT: Lazy<Argon2<'static>> = Lazy::new(|| {
    Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params(),
    )
});

#[cfg(not(test))]
fn params() -> argon2::Params {
    argon2::Params::DEFAULT
}

// unit tests hash a lot of passwords in debug builds
#[cfg(test)]
fn params() -> argon2::Params {
    argon2::Params::new(1024, 1, 1, None).unwrap_or_default()
}

#[derive(Debug, Error)]
#[error("Failed to generate password hash")]
pub struct HashPasswordError;

#[derive(Debug, Error)]
#[error("Failed to verify password")]
pub struct VerifyPasswordError;

/// Hashes a password into a PHC string. This is CPU heavy; async
/// callers go through [`hash_blocking`].
pub fn hash(password: &str) -> Result<String, HashPasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = CONTEXT
        .hash_password(password.as_bytes(), &salt)
        .change_context(HashPasswordError)?;

    Ok(hash.to_string())
}

pub fn verify(password: &str, hash: &str) -> Result<bool, VerifyPasswordError> {
    let hash = PasswordHash::new(hash)
        .change_context(VerifyPasswordError)
        .attach_printable("could not parse password hash")?;

    match CONTEXT.verify_password(password.as_bytes(), &hash) {
        Ok(..) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(error) => Err(error).change_context(VerifyPasswordError),
    }
}

pub async fn hash_blocking(password: String) -> Result<String, HashPasswordError> {
    tokio::task::spawn_blocking(move || hash(&password))
        .await
        .change_context(HashPasswordError)?
}

pub async fn verify_blocking(password: String, hash: String) -> Result<bool, VerifyPasswordError> {
    tokio::task::spawn_blocking(move || verify(&password, &hash))
        .await
        .change_context(VerifyPasswordError)?
}
