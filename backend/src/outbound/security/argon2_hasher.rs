//! Argon2id password hashing adapter.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// Hashes passwords into PHC strings with Argon2id and a random salt.
///
/// Uses the library's recommended Argon2id parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Create the hasher.
    pub const fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| PasswordHash::new(hash.to_string()))
            .map_err(|err| PasswordHasherError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        let parsed = password_hash::PasswordHash::new(hash.as_str())
            .map_err(|err| PasswordHasherError::malformed_hash(err.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHasherError::hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::new()
    }

    #[rstest]
    fn hash_is_salted_phc_string(hasher: Argon2PasswordHasher) {
        let first = hasher.hash("secreto").expect("hash");
        let second = hasher.hash("secreto").expect("hash");
        assert!(first.as_str().starts_with("$argon2id$"));
        assert_ne!(first.as_str(), second.as_str());
    }

    #[rstest]
    #[case("secreto", true)]
    #[case("Secreto", false)]
    #[case("", false)]
    fn verify_matches_only_original(
        hasher: Argon2PasswordHasher,
        #[case] candidate: &str,
        #[case] expected: bool,
    ) {
        let hash = hasher.hash("secreto").expect("hash");
        assert_eq!(hasher.verify(candidate, &hash).expect("verify"), expected);
    }

    #[rstest]
    fn garbage_hash_is_malformed(hasher: Argon2PasswordHasher) {
        let err = hasher
            .verify("secreto", &PasswordHash::new("plain-text".to_owned()))
            .expect_err("not a PHC string");
        assert!(matches!(err, PasswordHasherError::MalformedHash { .. }));
    }
}
