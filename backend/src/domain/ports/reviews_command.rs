//! Driving ports for nurse reviews.

use async_trait::async_trait;
use pagination::{Page, PageWindow};

use crate::domain::{Caller, Error, NewReview, NurseId, Review};

/// Domain use-case port for leaving reviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewsCommand: Send + Sync {
    /// Review the nurse of a completed request the caller opened.
    async fn create(&self, caller: Caller, new: NewReview) -> Result<Review, Error>;
}

/// Domain use-case port for reading reviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewsQuery: Send + Sync {
    /// One page of `nurse_id`'s reviews, newest first. Only that nurse may
    /// read them.
    async fn list_for_nurse(
        &self,
        caller: Caller,
        nurse_id: NurseId,
        window: PageWindow,
    ) -> Result<Page<Review>, Error>;
}
