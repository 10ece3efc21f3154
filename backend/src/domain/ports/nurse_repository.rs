//! Port for nurse account persistence and directory search.

use async_trait::async_trait;
use pagination::{Page, PageWindow};

use crate::domain::{NurseAccount, NurseId, NurseProfile, NurseSearch};

use super::define_port_error;

define_port_error! {
    /// Errors raised by nurse repository adapters.
    pub enum NurseRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "nurse repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "nurse repository query failed: {message}",
        /// The username is already registered among nurses.
        DuplicateUserName { user_name: String } => "nurse user name already registered: {user_name}",
    }
}

/// Port for storing nurse accounts and searching the nurse directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NurseRepository: Send + Sync {
    /// Insert a new account; fails with `DuplicateUserName` on collision.
    async fn insert(&self, account: &NurseAccount) -> Result<(), NurseRepositoryError>;

    /// Exact-match lookup by login name.
    async fn find_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<NurseAccount>, NurseRepositoryError>;

    /// Lookup by id.
    async fn find_by_id(&self, id: &NurseId) -> Result<Option<NurseAccount>, NurseRepositoryError>;

    /// Overwrite the profile attributes of an existing account.
    ///
    /// Returns `false` when no account has the profile's id.
    async fn update_profile(&self, profile: &NurseProfile) -> Result<bool, NurseRepositoryError>;

    /// One page of nurses matching `search`, in registration order.
    ///
    /// The page total counts every match, not just those on the page.
    async fn search(
        &self,
        search: &NurseSearch,
        window: PageWindow,
    ) -> Result<Page<NurseProfile>, NurseRepositoryError>;
}

/// Fixture implementation for tests that do not exercise nurse persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNurseRepository;

#[async_trait]
impl NurseRepository for FixtureNurseRepository {
    async fn insert(&self, _account: &NurseAccount) -> Result<(), NurseRepositoryError> {
        Ok(())
    }

    async fn find_by_user_name(
        &self,
        _user_name: &str,
    ) -> Result<Option<NurseAccount>, NurseRepositoryError> {
        Ok(None)
    }

    async fn find_by_id(
        &self,
        _id: &NurseId,
    ) -> Result<Option<NurseAccount>, NurseRepositoryError> {
        Ok(None)
    }

    async fn update_profile(&self, _profile: &NurseProfile) -> Result<bool, NurseRepositoryError> {
        Ok(false)
    }

    async fn search(
        &self,
        _search: &NurseSearch,
        window: PageWindow,
    ) -> Result<Page<NurseProfile>, NurseRepositoryError> {
        Ok(Page::new(window, 0, Vec::new()))
    }
}
