//! Driving ports for the identity store: login, registration and profiles.
//!
//! Inbound adapters call these to authenticate and manage accounts without
//! importing persistence or crypto adapters.

use async_trait::async_trait;
use pagination::{Page, PageWindow};

use crate::domain::{
    Caller, Error, IssuedToken, LoginCredentials, NewNurse, NewUser, NurseProfile, NurseSearch,
    NurseUpdate, Role, UserProfile, UserUpdate,
};

/// Profile of a newly registered account plus its first token.
#[derive(Debug, Clone, PartialEq)]
pub struct Registered<P> {
    pub profile: P,
    pub token: IssuedToken,
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Check `credentials` against the `role` collection and sign a token.
    ///
    /// Unknown usernames and wrong passwords fail identically with
    /// `unauthorized`.
    async fn login(&self, role: Role, credentials: &LoginCredentials)
    -> Result<IssuedToken, Error>;
}

/// Domain use-case port for account mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Register a user and sign them in.
    async fn register_user(&self, new: NewUser) -> Result<Registered<UserProfile>, Error>;

    /// Register a nurse and sign them in.
    async fn register_nurse(&self, new: NewNurse) -> Result<Registered<NurseProfile>, Error>;

    /// Update the calling user's profile.
    async fn update_user(&self, caller: Caller, update: UserUpdate) -> Result<UserProfile, Error>;

    /// Update the calling nurse's profile.
    async fn update_nurse(
        &self,
        caller: Caller,
        update: NurseUpdate,
    ) -> Result<NurseProfile, Error>;
}

/// Domain use-case port for account reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsQuery: Send + Sync {
    /// The calling user's profile.
    async fn user_profile(&self, caller: Caller) -> Result<UserProfile, Error>;

    /// The calling nurse's profile.
    async fn nurse_profile(&self, caller: Caller) -> Result<NurseProfile, Error>;

    /// One page of the user directory.
    async fn list_users(&self, window: PageWindow) -> Result<Page<UserProfile>, Error>;

    /// One page of the nurse directory filtered by `search`.
    async fn search_nurses(
        &self,
        search: NurseSearch,
        window: PageWindow,
    ) -> Result<Page<NurseProfile>, Error>;
}
