//! Driving ports for a nurse's payment ledger and invoices.

use async_trait::async_trait;
use pagination::{Page, PageWindow};

use crate::domain::{Caller, Error, Invoice, Transaction, TransactionId};

/// Domain use-case port for reading transactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionsQuery: Send + Sync {
    /// One page of the calling nurse's transactions, newest first.
    async fn list_for_caller(
        &self,
        caller: Caller,
        window: PageWindow,
    ) -> Result<Page<Transaction>, Error>;
}

/// Domain use-case port for invoicing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceCommand: Send + Sync {
    /// Render an invoice for one of the calling nurse's transactions.
    async fn issue_invoice(&self, caller: Caller, id: TransactionId) -> Result<Invoice, Error>;
}
