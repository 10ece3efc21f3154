//! Port for review persistence.

use async_trait::async_trait;
use pagination::{Page, PageWindow};

use crate::domain::{NurseId, Review};

use super::define_port_error;

define_port_error! {
    /// Errors raised by review repository adapters.
    pub enum ReviewRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
        /// The user already reviewed this service request.
        Duplicate { message: String } => "review already exists: {message}",
    }
}

/// Port for storing reviews and listing them per nurse.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a review; at most one per user and service request.
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError>;

    /// One page of a nurse's reviews, newest first.
    async fn list_for_nurse(
        &self,
        nurse_id: &NurseId,
        window: PageWindow,
    ) -> Result<Page<Review>, ReviewRepositoryError>;
}

/// Fixture implementation for tests that do not exercise review persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReviewRepository;

#[async_trait]
impl ReviewRepository for FixtureReviewRepository {
    async fn insert(&self, _review: &Review) -> Result<(), ReviewRepositoryError> {
        Ok(())
    }

    async fn list_for_nurse(
        &self,
        _nurse_id: &NurseId,
        window: PageWindow,
    ) -> Result<Page<Review>, ReviewRepositoryError> {
        Ok(Page::new(window, 0, Vec::new()))
    }
}
