//! Credential hashing and bearer token adapters.

mod argon2_hasher;
mod jwt_token_service;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt_token_service::JwtTokenService;
