use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(password_hash::Error),
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(password_hash::Error),
    #[error("password verification failed: {0}")]
    Verify(password_hash::Error),
}

/// Argon2id, v0x13, default cost. Stored hashes carry their own parameters,
/// so verification keeps working for older hashes if these change.
fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

/// Hashes `plain` with a fresh random salt into a PHC string.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "password hashing failed");
            PasswordError::Hash(e)
        })
}

/// `Ok(false)` on mismatch; errors only when the stored hash can't be used.
pub fn verify_password(plain: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "stored password hash is malformed");
        PasswordError::MalformedHash(e)
    })?;
    match hasher().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => {
            error!(error = %e, "password verification failed");
            Err(PasswordError::Verify(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_argon2id_phc() {
        let hash = hash_password("budget-2024").unwrap();
        assert!(hash.starts_with("$argon2id$v=19$"));
        assert!(!hash.contains("budget-2024"));
        assert!(verify_password("budget-2024", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("savings").unwrap();
        let b = hash_password("savings").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("savings", &a).unwrap());
        assert!(verify_password("savings", &b).unwrap());
    }

    #[test]
    fn mismatch_is_false_not_an_error() {
        let hash = hash_password("correct-horse").unwrap();
        assert!(!verify_password("wrong-horse", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        match verify_password("anything", "not-a-valid-hash") {
            Err(PasswordError::MalformedHash(_)) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
