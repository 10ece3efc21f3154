//! Service request lifecycle service.
//!
//! Every mutation is a read followed by a write with no lock in between, so
//! concurrent transitions of the same request resolve as last write wins.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use super::ports::{
    ServiceRequestRepository, ServiceRequestsCommand, ServiceRequestsQuery, TransactionRepository,
};
use super::repository_errors::{map_service_request_error, map_transaction_error};
use super::{
    Caller, Error, Estado, NewServiceRequest, NurseId, ServiceRequest, ServiceRequestId,
    Transaction, TransactionId,
};

/// Lifecycle service implementing the service request driving ports.
#[derive(Clone)]
pub struct ServiceRequestService<S, T> {
    requests: Arc<S>,
    transactions: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<S, T> ServiceRequestService<S, T> {
    /// Create the service over request and transaction repositories.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use carematch::domain::ServiceRequestService;
    /// # use carematch::domain::ports::{FixtureServiceRequestRepository, FixtureTransactionRepository};
    /// # use mockable::DefaultClock;
    /// let service = ServiceRequestService::new(
    ///     Arc::new(FixtureServiceRequestRepository),
    ///     Arc::new(FixtureTransactionRepository),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(requests: Arc<S>, transactions: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            requests,
            transactions,
            clock,
        }
    }
}

impl<S, T> ServiceRequestService<S, T>
where
    S: ServiceRequestRepository,
{
    async fn load(&self, id: ServiceRequestId) -> Result<ServiceRequest, Error> {
        self.requests
            .find_by_id(&id)
            .await
            .map_err(map_service_request_error)?
            .ok_or_else(|| Error::not_found(format!("service request {id} not found")))
    }

    async fn save(&self, request: &ServiceRequest) -> Result<(), Error> {
        let updated = self
            .requests
            .update(request)
            .await
            .map_err(map_service_request_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::not_found(format!(
                "service request {} not found",
                request.id
            )))
        }
    }

    async fn load_for_payer(
        &self,
        caller: &Caller,
        id: ServiceRequestId,
    ) -> Result<ServiceRequest, Error> {
        let request = self.load(id).await?;
        if caller.user_id() != Some(request.user_id) {
            debug!(service_request_id = %id, caller = %caller.id(), "payment denied");
            return Err(Error::forbidden(
                "only the requesting user may manage this payment",
            ));
        }
        Ok(request)
    }
}

#[async_trait]
impl<S, T> ServiceRequestsCommand for ServiceRequestService<S, T>
where
    S: ServiceRequestRepository,
    T: TransactionRepository,
{
    async fn create(&self, new: NewServiceRequest) -> Result<ServiceRequest, Error> {
        let request = ServiceRequest::create(ServiceRequestId::random(), new, self.clock.utc());
        self.requests
            .insert(&request)
            .await
            .map_err(map_service_request_error)?;
        info!(
            service_request_id = %request.id,
            nurse_id = %request.nurse_id,
            estado = %request.estado,
            "service request created"
        );
        Ok(request)
    }

    async fn transition(
        &self,
        caller: Caller,
        id: ServiceRequestId,
        estado: Estado,
    ) -> Result<ServiceRequest, Error> {
        let mut request = self.load(id).await?;
        if caller.nurse_id() != Some(request.nurse_id) {
            debug!(service_request_id = %id, caller = %caller.id(), "transition denied");
            return Err(Error::forbidden(
                "only the assigned nurse may change the state of this service request",
            ));
        }

        let previous = request.estado;
        request.transition(estado, self.clock.utc())?;
        self.save(&request).await?;
        info!(service_request_id = %id, from = %previous, to = %estado, "service request transitioned");
        Ok(request)
    }

    async fn pay(&self, caller: Caller, id: ServiceRequestId) -> Result<Transaction, Error> {
        let mut request = self.load_for_payer(&caller, id).await?;
        let now = self.clock.utc();
        request.mark_paid(now)?;

        // A ledger row without the paid flag is left by an attempt whose
        // request update failed; finish that payment instead of recording a
        // second one.
        let recorded = self
            .transactions
            .find_for_request(&id)
            .await
            .map_err(map_transaction_error)?;
        let transaction = if let Some(existing) = recorded {
            warn!(
                service_request_id = %id,
                transaction_id = %existing.id,
                "completing interrupted payment"
            );
            existing
        } else {
            let transaction = Transaction::for_payment(TransactionId::random(), &request, now);
            self.transactions
                .insert(&transaction)
                .await
                .map_err(map_transaction_error)?;
            transaction
        };
        self.save(&request).await?;
        info!(service_request_id = %id, transaction_id = %transaction.id, "payment recorded");
        Ok(transaction)
    }

    async fn release_payment(
        &self,
        caller: Caller,
        id: ServiceRequestId,
    ) -> Result<ServiceRequest, Error> {
        let mut request = self.load_for_payer(&caller, id).await?;
        request.release_payment(self.clock.utc())?;
        self.save(&request).await?;
        info!(service_request_id = %id, "payment released");
        Ok(request)
    }
}

#[async_trait]
impl<S, T> ServiceRequestsQuery for ServiceRequestService<S, T>
where
    S: ServiceRequestRepository,
    T: TransactionRepository,
{
    async fn list_all(&self) -> Result<Vec<ServiceRequest>, Error> {
        self.requests
            .list_all()
            .await
            .map_err(map_service_request_error)
    }

    async fn list_for_nurse(&self, nurse_id: NurseId) -> Result<Vec<ServiceRequest>, Error> {
        let requests = self
            .requests
            .list_for_nurse(&nurse_id)
            .await
            .map_err(map_service_request_error)?;
        if requests.is_empty() {
            return Err(Error::not_found(format!(
                "no service requests found for nurse {nurse_id}"
            )));
        }
        Ok(requests)
    }

    async fn get(&self, caller: Caller, id: ServiceRequestId) -> Result<ServiceRequest, Error> {
        let request = self.load(id).await?;
        request.ensure_party(&caller).inspect_err(|_| {
            debug!(service_request_id = %id, caller = %caller.id(), "service request read denied");
        })?;
        Ok(request)
    }
}

#[cfg(test)]
#[path = "service_request_service_tests.rs"]
mod tests;
