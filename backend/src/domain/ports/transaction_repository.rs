//! Port for payment transaction persistence.

use async_trait::async_trait;
use pagination::{Page, PageWindow};

use crate::domain::{NurseId, ServiceRequestId, Transaction, TransactionId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by transaction repository adapters.
    pub enum TransactionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "transaction repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "transaction repository query failed: {message}",
        /// A payment already exists for the service request.
        Duplicate { message: String } => "transaction already recorded: {message}",
    }
}

/// Port for recording payments and reading a nurse's ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Record a payment; at most one per service request.
    async fn insert(&self, transaction: &Transaction) -> Result<(), TransactionRepositoryError>;

    /// The payment recorded for a service request, if any.
    async fn find_for_request(
        &self,
        service_request_id: &ServiceRequestId,
    ) -> Result<Option<Transaction>, TransactionRepositoryError>;

    /// Lookup a transaction that belongs to `nurse_id`.
    async fn find_for_nurse(
        &self,
        id: &TransactionId,
        nurse_id: &NurseId,
    ) -> Result<Option<Transaction>, TransactionRepositoryError>;

    /// One page of a nurse's transactions, newest payment first.
    async fn list_for_nurse(
        &self,
        nurse_id: &NurseId,
        window: PageWindow,
    ) -> Result<Page<Transaction>, TransactionRepositoryError>;
}

/// Fixture implementation for tests that do not exercise payment persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTransactionRepository;

#[async_trait]
impl TransactionRepository for FixtureTransactionRepository {
    async fn insert(&self, _transaction: &Transaction) -> Result<(), TransactionRepositoryError> {
        Ok(())
    }

    async fn find_for_request(
        &self,
        _service_request_id: &ServiceRequestId,
    ) -> Result<Option<Transaction>, TransactionRepositoryError> {
        Ok(None)
    }

    async fn find_for_nurse(
        &self,
        _id: &TransactionId,
        _nurse_id: &NurseId,
    ) -> Result<Option<Transaction>, TransactionRepositoryError> {
        Ok(None)
    }

    async fn list_for_nurse(
        &self,
        _nurse_id: &NurseId,
        window: PageWindow,
    ) -> Result<Page<Transaction>, TransactionRepositoryError> {
        Ok(Page::new(window, 0, Vec::new()))
    }
}
