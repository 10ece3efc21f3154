//! Authentication primitives: login credentials, roles and the verified
//! caller identity carried through every authenticated request.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::{Error, NurseId, UserId};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "user_name must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

impl From<LoginValidationError> for Error {
    fn from(value: LoginValidationError) -> Self {
        let field = match value {
            LoginValidationError::EmptyUsername => "user_name",
            LoginValidationError::EmptyPassword => "password",
        };
        Error::invalid_request(value.to_string())
            .with_details(json!({ "field": field, "code": "required" }))
    }
}

/// Validated login credentials used by the identity store.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use carematch::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ana ", "secreto").unwrap();
/// assert_eq!(creds.username(), "ana");
/// assert_eq!(creds.password(), "secreto");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for the exact-match lookup.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Which identity collection an account belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Care-seeking account that owns patients and opens service requests.
    User,
    /// Nurse account assigned to service requests.
    Nurse,
}

impl Role {
    /// Wire representation used in tokens and payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Nurse => "nurse",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "nurse" => Ok(Self::Nurse),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Identity and role decoded from a verified bearer token.
///
/// # Examples
/// ```
/// use carematch::domain::{Caller, NurseId, Role, UserId};
/// use uuid::Uuid;
///
/// let id = Uuid::new_v4();
/// let caller = Caller::new(id, Role::Nurse);
/// assert_eq!(caller.nurse_id(), Some(NurseId::from_uuid(id)));
/// assert!(caller.user_id().is_none());
/// assert!(caller.is_party(UserId::random(), NurseId::from_uuid(id)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    id: Uuid,
    role: Role,
}

impl Caller {
    /// Build a caller from decoded claims.
    pub const fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    /// Raw identity id.
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Role the token was issued for.
    pub const fn role(&self) -> Role {
        self.role
    }

    /// The caller's user id when authenticated as a user.
    pub fn user_id(&self) -> Option<UserId> {
        matches!(self.role, Role::User).then(|| UserId::from_uuid(self.id))
    }

    /// The caller's nurse id when authenticated as a nurse.
    pub fn nurse_id(&self) -> Option<NurseId> {
        matches!(self.role, Role::Nurse).then(|| NurseId::from_uuid(self.id))
    }

    /// Whether the caller is the user or the nurse named here.
    pub fn is_party(&self, user_id: UserId, nurse_id: NurseId) -> bool {
        self.user_id() == Some(user_id) || self.nurse_id() == Some(nurse_id)
    }

    /// Require a user caller, otherwise `forbidden`.
    pub fn require_user(&self) -> Result<UserId, Error> {
        self.user_id()
            .ok_or_else(|| Error::forbidden("only user accounts may perform this action"))
    }

    /// Require a nurse caller, otherwise `forbidden`.
    pub fn require_nurse(&self) -> Result<NurseId, Error> {
        self.nurse_id()
            .ok_or_else(|| Error::forbidden("only nurse accounts may perform this action"))
    }
}

/// Failures verifying a presented bearer token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No usable bearer token accompanied the request.
    #[error("authentication token not provided")]
    MissingToken,
    /// Signature or expiry check failed.
    #[error("authentication token is invalid or expired")]
    InvalidToken,
    /// The token verified but did not carry a usable identity.
    #[error("authentication token does not identify a caller")]
    MalformedClaims,
}

impl From<AuthError> for Error {
    fn from(value: AuthError) -> Self {
        let message = value.to_string();
        match value {
            AuthError::MissingToken => Error::unauthorized(message),
            AuthError::InvalidToken => Error::forbidden(message),
            AuthError::MalformedClaims => Error::invalid_request(message)
                .with_details(json!({ "code": "malformed_claims" })),
        }
    }
}

/// A freshly signed bearer token and the role it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct IssuedToken {
    /// Signed bearer credential.
    pub token: String,
    /// Role embedded in the token.
    pub role: Role,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("ana", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn password_whitespace_is_preserved() {
        let creds = LoginCredentials::try_from_parts("ana", " pw ").expect("valid credentials");
        assert_eq!(creds.password(), " pw ");
    }

    #[rstest]
    #[case(AuthError::MissingToken, ErrorCode::Unauthorized)]
    #[case(AuthError::InvalidToken, ErrorCode::Forbidden)]
    #[case(AuthError::MalformedClaims, ErrorCode::InvalidRequest)]
    fn auth_errors_map_to_codes(#[case] error: AuthError, #[case] expected: ErrorCode) {
        assert_eq!(Error::from(error).code(), expected);
    }

    #[rstest]
    fn user_caller_is_party_only_as_user() {
        let id = Uuid::new_v4();
        let caller = Caller::new(id, Role::User);
        assert!(caller.is_party(UserId::from_uuid(id), NurseId::random()));
        // Same raw uuid in the nurse slot does not count for a user token.
        assert!(!caller.is_party(UserId::random(), NurseId::from_uuid(id)));
    }

    #[rstest]
    fn require_nurse_rejects_users() {
        let caller = Caller::new(Uuid::new_v4(), Role::User);
        let err = caller.require_nurse().expect_err("users are not nurses");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case("user", Some(Role::User))]
    #[case("nurse", Some(Role::Nurse))]
    #[case("admin", None)]
    fn role_parses_wire_values(#[case] raw: &str, #[case] expected: Option<Role>) {
        assert_eq!(raw.parse::<Role>().ok(), expected);
    }
}
