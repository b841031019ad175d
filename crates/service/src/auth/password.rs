use argon2::{password_hash::{PasswordHasher, PasswordVerifier, SaltString}, Argon2, PasswordHash};
use rand::rngs::OsRng;

use super::errors::AuthError;

/// Argon2 PHC string with a fresh random salt.
pub fn hash_password(plaintext: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::HashError(e.to_string()))
}

/// Constant-time check of `plaintext` against a stored hash.
///
/// A stored value that is not a PHC string (including the empty hash of a
/// user that never set a password) can match nothing.
pub fn verify_password(plaintext: &str, hashed: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hashed).map_err(|_| AuthError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("04234").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert_ne!(hash, "04234");
        assert!(verify_password("04234", &hash).is_ok());
    }

    #[test]
    fn wrong_password_is_rejected() {
        let hash = hash_password("04234").unwrap();
        for other in ["04235", "", "04234 ", "O4234"] {
            assert_eq!(verify_password(other, &hash), Err(AuthError::InvalidCredentials));
        }
    }

    #[test]
    fn salts_differ() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same", &a).is_ok());
        assert!(verify_password("same", &b).is_ok());
    }

    #[test]
    fn empty_stored_hash_never_matches() {
        assert_eq!(verify_password("", ""), Err(AuthError::InvalidCredentials));
        assert_eq!(verify_password("anything", "plaintext"), Err(AuthError::InvalidCredentials));
    }
}
