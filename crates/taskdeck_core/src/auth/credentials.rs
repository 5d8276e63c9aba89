//! Password hashing and verification.
//!
//! # Invariants
//! - Stored hashes are salted Argon2id PHC strings; the plain password never
//!   leaves this module's call frame.
//! - Verification failure is a plain `false`; callers cannot distinguish
//!   "wrong password" from "unparseable stored hash".

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Credential hashing errors.
#[derive(Debug)]
pub enum CredentialError {
    Hash(argon2::password_hash::Error),
}

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hash(err) => write!(f, "password hashing failed: {err}"),
        }
    }
}

impl Error for CredentialError {}

/// Hashes a plain password into a salted PHC string.
pub fn hash_password(plain: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(CredentialError::Hash)?;
    Ok(hash.to_string())
}

/// Returns whether `plain` matches the stored PHC string.
pub fn verify_password(plain: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = hash_password("hunter2").expect("hashing should succeed");
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("same").expect("hashing should succeed");
        let second = hash_password("same").expect("hashing should succeed");
        assert_ne!(first, second);
    }

    #[test]
    fn unparseable_stored_hash_verifies_false() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }
}
