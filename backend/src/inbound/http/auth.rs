//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers that need a caller take an [`Authenticated`] argument; the
//! extractor reads `Authorization: Bearer <token>`, verifies it through the
//! [`TokenService`](crate::domain::ports::TokenService) held in
//! [`HttpState`], and hands the decoded [`Caller`] to the handler.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{AuthError, Caller, Error};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// The verified caller of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated(pub Caller);

impl Authenticated {
    /// The decoded caller.
    pub fn caller(&self) -> Caller {
        self.0
    }
}

/// Pull the token out of an `Authorization` header value.
///
/// A header with another scheme, or an empty token, counts as missing.
pub(crate) fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    header
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}

fn authenticate(req: &HttpRequest) -> Result<Authenticated, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let token = bearer_token(header)?;
    let caller = state.tokens.verify(token).inspect_err(|err| {
        debug!(error = %err, path = %req.path(), "bearer token rejected");
    })?;
    Ok(Authenticated(caller))
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
