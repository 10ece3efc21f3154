//! A nurse's payment ledger and invoice rendering.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageWindow};

use super::ports::{InvoiceCommand, TransactionRepository, TransactionsQuery};
use super::repository_errors::map_transaction_error;
use super::{Caller, Error, Invoice, Transaction, TransactionId};

/// Transaction service implementing the ledger driving ports.
#[derive(Clone)]
pub struct TransactionService<T> {
    transactions: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<T> TransactionService<T> {
    /// Create the service over a transaction repository.
    pub fn new(transactions: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            transactions,
            clock,
        }
    }
}

#[async_trait]
impl<T> TransactionsQuery for TransactionService<T>
where
    T: TransactionRepository,
{
    async fn list_for_caller(
        &self,
        caller: Caller,
        window: PageWindow,
    ) -> Result<Page<Transaction>, Error> {
        let nurse_id = caller.require_nurse()?;
        self.transactions
            .list_for_nurse(&nurse_id, window)
            .await
            .map_err(map_transaction_error)
    }
}

#[async_trait]
impl<T> InvoiceCommand for TransactionService<T>
where
    T: TransactionRepository,
{
    async fn issue_invoice(&self, caller: Caller, id: TransactionId) -> Result<Invoice, Error> {
        let nurse_id = caller.require_nurse()?;
        let transaction = self
            .transactions
            .find_for_nurse(&id, &nurse_id)
            .await
            .map_err(map_transaction_error)?
            .ok_or_else(|| Error::not_found(format!("transaction {id} not found")))?;
        Ok(Invoice::issue(transaction, self.clock.utc()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{FixtureTransactionRepository, MockTransactionRepository};
    use crate::domain::transaction::INVOICE_DETAILS;
    use crate::domain::{ErrorCode, NurseId, Role, ServiceRequestId, UserId};
    use crate::test_support::MutableClock;
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, day, 8, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    fn service<T>(transactions: T) -> TransactionService<T> {
        TransactionService::new(Arc::new(transactions), Arc::new(MutableClock::new(at(20))))
    }

    #[rstest]
    #[tokio::test]
    async fn users_have_no_ledger() {
        let err = service(FixtureTransactionRepository)
            .list_for_caller(Caller::new(Uuid::new_v4(), Role::User), PageWindow::default())
            .await
            .expect_err("users are not payees");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn invoice_copies_transaction_and_stamps_issue_time() {
        let nurse_id = NurseId::random();
        let transaction = Transaction {
            id: TransactionId::random(),
            nurse_id,
            user_id: UserId::random(),
            service_request_id: ServiceRequestId::random(),
            monto: 80.0,
            fecha_pago: at(3),
            estado: "completado".to_owned(),
        };
        let id = transaction.id;
        let mut repo = MockTransactionRepository::new();
        repo.expect_find_for_nurse()
            .withf(move |tx_id, owner| *tx_id == id && *owner == nurse_id)
            .times(1)
            .return_once(move |_, _| Ok(Some(transaction)));

        let invoice = service(repo)
            .issue_invoice(Caller::new(*nurse_id.as_uuid(), Role::Nurse), id)
            .await
            .expect("own transaction");
        assert_eq!(invoice.fecha_pago, at(3));
        assert_eq!(invoice.fecha_factura, at(20));
        assert_eq!(invoice.detalles, INVOICE_DETAILS);
    }

    #[rstest]
    #[tokio::test]
    async fn foreign_transaction_is_not_found() {
        let err = service(FixtureTransactionRepository)
            .issue_invoice(
                Caller::new(Uuid::new_v4(), Role::Nurse),
                TransactionId::random(),
            )
            .await
            .expect_err("not the payee");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
