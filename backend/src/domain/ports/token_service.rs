//! Port for issuing and verifying stateless bearer tokens.
//!
//! Tokens are self-contained: there is no server-side session store and no
//! revocation list, so a token stays valid until it expires.

use uuid::Uuid;

use crate::domain::{AuthError, Caller, IssuedToken, Role};

use super::define_port_error;

define_port_error! {
    /// Errors raised while signing a token.
    pub enum TokenServiceError {
        /// The signer rejected the claims or key.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Port for the token service.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token for `identity_id` acting as `role`.
    fn issue(&self, identity_id: Uuid, role: Role) -> Result<IssuedToken, TokenServiceError>;

    /// Verify `token` and decode the caller it identifies.
    ///
    /// An empty token is [`AuthError::MissingToken`]; a bad signature or
    /// expiry is [`AuthError::InvalidToken`]; a verified token without a
    /// usable identity is [`AuthError::MalformedClaims`].
    fn verify(&self, token: &str) -> Result<Caller, AuthError>;
}

const FIXTURE_PREFIX: &str = "fixture";

/// Unsigned `fixture.<role>.<uuid>` tokens for handler tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTokenService;

impl FixtureTokenService {
    /// Render the token that [`FixtureTokenService::verify`] accepts.
    pub fn token_for(identity_id: Uuid, role: Role) -> String {
        format!("{FIXTURE_PREFIX}.{role}.{identity_id}")
    }
}

impl TokenService for FixtureTokenService {
    fn issue(&self, identity_id: Uuid, role: Role) -> Result<IssuedToken, TokenServiceError> {
        Ok(IssuedToken {
            token: Self::token_for(identity_id, role),
            role,
        })
    }

    fn verify(&self, token: &str) -> Result<Caller, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        let mut parts = token.splitn(3, '.');
        if parts.next() != Some(FIXTURE_PREFIX) {
            return Err(AuthError::InvalidToken);
        }
        let role = parts
            .next()
            .and_then(|raw| raw.parse::<Role>().ok())
            .ok_or(AuthError::MalformedClaims)?;
        let id = parts
            .next()
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or(AuthError::MalformedClaims)?;
        Ok(Caller::new(id, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fixture_tokens_round_trip() {
        let id = Uuid::new_v4();
        let issued = FixtureTokenService.issue(id, Role::Nurse).expect("issue");
        let caller = FixtureTokenService.verify(&issued.token).expect("verify");
        assert_eq!(caller, Caller::new(id, Role::Nurse));
    }

    #[rstest]
    #[case("", AuthError::MissingToken)]
    #[case("garbage", AuthError::InvalidToken)]
    #[case("fixture.user", AuthError::MalformedClaims)]
    #[case("fixture.admin.00000000-0000-0000-0000-000000000000", AuthError::MalformedClaims)]
    fn fixture_rejections(#[case] token: &str, #[case] expected: AuthError) {
        assert_eq!(FixtureTokenService.verify(token), Err(expected));
    }
}
