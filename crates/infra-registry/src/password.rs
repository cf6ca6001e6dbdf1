//! Password hashing for user records
//!
//! Passwords are hashed with Argon2id before they reach a store; the PHC
//! string embeds the salt and parameters.

use crate::error::{RegistryError, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use rand::rngs::OsRng;

/// Hash a password into an Argon2id PHC string
pub fn hash_password(password: impl AsRef<str>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_ref().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(hashing_failed)
}

fn hashing_failed(e: argon2::password_hash::Error) -> RegistryError {
    RegistryError::PasswordHash(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    #[test]
    fn test_hash_verifies_against_original_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));

        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"correct horse", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"wrong horse", &parsed)
                .is_err()
        );
    }

    #[test]
    fn test_hashing_failure_is_not_a_storage_error() {
        let err = hashing_failed(argon2::password_hash::Error::Password);
        assert!(matches!(err, RegistryError::PasswordHash(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();
        assert_ne!(first, second);
    }
}
