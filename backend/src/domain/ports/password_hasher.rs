//! Port for one-way credential hashing.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Port for hashing new passwords and verifying supplied ones.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh salt.
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError>;

    /// Whether `password` matches `hash`.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError>;
}

const FIXTURE_PREFIX: &str = "fixture$";

/// Reversible stand-in for tests; never wire it into a server.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        Ok(PasswordHash::new(format!("{FIXTURE_PREFIX}{password}")))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        hash.as_str()
            .strip_prefix(FIXTURE_PREFIX)
            .map(|stored| stored == password)
            .ok_or_else(|| PasswordHasherError::malformed_hash("missing fixture prefix"))
    }
}
