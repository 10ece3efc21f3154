//! Port for user account persistence.

use async_trait::async_trait;
use pagination::{Page, PageWindow};

use crate::domain::{UserAccount, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already registered.
        DuplicateUserName { user_name: String } => "user name already registered: {user_name}",
    }
}

/// Port for storing user accounts and reading the user directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account; fails with `DuplicateUserName` on collision.
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError>;

    /// Exact-match lookup by login name.
    async fn find_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<UserAccount>, UserRepositoryError>;

    /// Lookup by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError>;

    /// Overwrite the profile attributes of an existing account.
    ///
    /// Returns `false` when no account has the profile's id.
    async fn update_profile(&self, profile: &UserProfile) -> Result<bool, UserRepositoryError>;

    /// One page of the directory in registration order.
    async fn list(&self, window: PageWindow) -> Result<Page<UserProfile>, UserRepositoryError>;
}

/// Fixture implementation for tests that do not exercise user persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn insert(&self, _account: &UserAccount) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn find_by_user_name(
        &self,
        _user_name: &str,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError> {
        Ok(None)
    }

    async fn update_profile(&self, _profile: &UserProfile) -> Result<bool, UserRepositoryError> {
        Ok(false)
    }

    async fn list(&self, window: PageWindow) -> Result<Page<UserProfile>, UserRepositoryError> {
        Ok(Page::new(window, 0, Vec::new()))
    }
}
