//! Password digests stored in `users.password` as argon2id PHC strings
//! (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`).

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Hashes `password` with a fresh random salt and the default argon2id
/// parameters.
pub fn hash_password(password: &str) -> ResultEngine<String> {
    let hashing = |err: argon2::password_hash::Error| EngineError::Hashing(err.to_string());

    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes()).map_err(hashing)?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(hashing)?;
    Ok(hash.to_string())
}

/// Checks `password` against a value produced by [`hash_password`].
///
/// Anything that is not a parseable PHC string never verifies.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let stored = hash_password("123456").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(verify_password("123456", &stored));
        assert!(!verify_password("1234567", &stored));
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(
            hash_password("secret").unwrap(),
            hash_password("secret").unwrap()
        );
    }

    #[test]
    fn malformed_stored_value_never_verifies() {
        assert!(!verify_password("123456", "123456"));
        assert!(!verify_password("", ""));
        // A bare `salt$digest` pair is not a PHC string.
        assert!(!verify_password(
            "123456",
            "0f1e2d3c4b5a69788796a5b4c3d2e1f0$jZae727K08KaOmKSgOaGzww/XVqGr/PKEgIMkjrcbJI="
        ));
    }
}
