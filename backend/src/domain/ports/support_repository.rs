//! Port for support tickets and FAQ entries.

use async_trait::async_trait;
use pagination::{Page, PageWindow};

use crate::domain::{Faq, SupportRequest};

use super::define_port_error;

define_port_error! {
    /// Errors raised by support repository adapters.
    pub enum SupportRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "support repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "support repository query failed: {message}",
    }
}

/// Port for opening tickets and reading the FAQ.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SupportRepository: Send + Sync {
    /// Store a new ticket.
    async fn insert_request(&self, request: &SupportRequest) -> Result<(), SupportRepositoryError>;

    /// One page of FAQ entries in insertion order.
    async fn list_faqs(&self, window: PageWindow) -> Result<Page<Faq>, SupportRepositoryError>;
}

/// Fixture implementation for tests that do not exercise support persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSupportRepository;

#[async_trait]
impl SupportRepository for FixtureSupportRepository {
    async fn insert_request(&self, _request: &SupportRequest) -> Result<(), SupportRepositoryError> {
        Ok(())
    }

    async fn list_faqs(&self, window: PageWindow) -> Result<Page<Faq>, SupportRepositoryError> {
        Ok(Page::new(window, 0, Vec::new()))
    }
}
