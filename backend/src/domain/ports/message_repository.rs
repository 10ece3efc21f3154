//! Port for message persistence.

use async_trait::async_trait;
use pagination::{Page, PageWindow};

use crate::domain::{Message, ServiceRequestId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by message repository adapters.
    pub enum MessageRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "message repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "message repository query failed: {message}",
    }
}

/// Port for appending messages and reading a request's history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Append a message.
    async fn insert(&self, message: &Message) -> Result<(), MessageRepositoryError>;

    /// One page of a request's messages, oldest first.
    async fn list_for_request(
        &self,
        service_request_id: &ServiceRequestId,
        window: PageWindow,
    ) -> Result<Page<Message>, MessageRepositoryError>;
}

/// Fixture implementation for tests that do not exercise message persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMessageRepository;

#[async_trait]
impl MessageRepository for FixtureMessageRepository {
    async fn insert(&self, _message: &Message) -> Result<(), MessageRepositoryError> {
        Ok(())
    }

    async fn list_for_request(
        &self,
        _service_request_id: &ServiceRequestId,
        window: PageWindow,
    ) -> Result<Page<Message>, MessageRepositoryError> {
        Ok(Page::new(window, 0, Vec::new()))
    }
}
