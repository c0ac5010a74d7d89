use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::{Rng, distributions::Alphanumeric, thread_rng};

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;
const GENERATED_PASSWORD_LEN: usize = 32;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AppError::internal(format!("Password hashing failed: {err}")))?
        .to_string();
    Ok(hash)
}

/// A stored hash that does not parse counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!("stored password hash is unreadable: {err}");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Throwaway credential for accounts created through an external provider.
pub fn random_password() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect()
}
