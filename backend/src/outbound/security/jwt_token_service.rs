//! HS256 JSON Web Token adapter for the token service port.
//!
//! Claims are `{sub, role, iat, exp}`. Expiry is checked against the injected
//! clock rather than the system time so tests can move time forward.

use std::sync::Arc;

use chrono::TimeDelta;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{TokenService, TokenServiceError};
use crate::domain::{AuthError, Caller, IssuedToken, Role};

#[derive(Debug, Serialize)]
struct Claims<'a> {
    sub: String,
    role: &'a str,
    iat: i64,
    exp: i64,
}

/// Claims as read back; identity fields are optional so that a verified but
/// incomplete token is reported as malformed rather than invalid.
#[derive(Debug, Deserialize)]
struct RawClaims {
    sub: Option<String>,
    role: Option<String>,
    exp: i64,
}

/// Signs and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Build a service signing with `secret`; tokens expire `ttl` after issue.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use carematch::outbound::security::JwtTokenService;
    /// # use chrono::TimeDelta;
    /// # use mockable::DefaultClock;
    /// let tokens = JwtTokenService::new(b"change-me", TimeDelta::hours(1), Arc::new(DefaultClock));
    /// # let _ = tokens;
    /// ```
    pub fn new(secret: &[u8], ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, identity_id: Uuid, role: Role) -> Result<IssuedToken, TokenServiceError> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenServiceError::signing("token expiry is out of range"))?;
        let claims = Claims {
            sub: identity_id.to_string(),
            role: role.as_str(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenServiceError::signing(err.to_string()))?;
        Ok(IssuedToken { token, role })
    }

    fn verify(&self, token: &str) -> Result<Caller, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::MissingToken);
        }

        let data = decode::<RawClaims>(token, &self.decoding, &self.validation).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            match err.kind() {
                ErrorKind::Json(_) => AuthError::MalformedClaims,
                _ => AuthError::InvalidToken,
            }
        })?;
        let claims = data.claims;

        if claims.exp <= self.clock.utc().timestamp() {
            debug!("bearer token expired");
            return Err(AuthError::InvalidToken);
        }

        let id = claims
            .sub
            .as_deref()
            .and_then(|sub| Uuid::parse_str(sub).ok())
            .ok_or(AuthError::MalformedClaims)?;
        let role = claims
            .role
            .as_deref()
            .and_then(|role| role.parse::<Role>().ok())
            .ok_or(AuthError::MalformedClaims)?;
        Ok(Caller::new(id, role))
    }
}
