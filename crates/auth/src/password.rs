use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;

use crate::error::{AuthError, Result};

/// Hash a secret with Argon2id under a fresh random salt.
///
/// Returns a PHC-format string; hashing the same secret twice yields two
/// different digests, both of which verify.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Check a secret against a stored PHC-format digest.
///
/// A non-matching secret is `Ok(false)`, never an error; the comparison is
/// the argon2 crate's constant-time verify. An unparsable digest means the
/// stored record is corrupt and surfaces as a hashing failure.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AuthError::Hashing(format!("bad digest: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("Secret123!").unwrap();

        assert!(verify_password("Secret123!", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn same_secret_hashes_differently() {
        let first = hash_password("secret1").unwrap();
        let second = hash_password("secret1").unwrap();

        // Fresh salt per call
        assert_ne!(first, second);

        assert!(verify_password("secret1", &first).unwrap());
        assert!(verify_password("secret1", &second).unwrap());
        assert!(!verify_password("secret2", &first).unwrap());
        assert!(!verify_password("secret2", &second).unwrap());
    }

    #[test]
    fn corrupt_digest_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
