//! Driving ports for the service request lifecycle and simulated payments.

use async_trait::async_trait;

use crate::domain::{
    Caller, Error, Estado, NewServiceRequest, NurseId, ServiceRequest, ServiceRequestId,
    Transaction,
};

/// Domain use-case port for lifecycle mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceRequestsCommand: Send + Sync {
    /// Store a new request as supplied.
    async fn create(&self, new: NewServiceRequest) -> Result<ServiceRequest, Error>;

    /// Move a request to `estado`. Only the assigned nurse may do so.
    async fn transition(
        &self,
        caller: Caller,
        id: ServiceRequestId,
        estado: Estado,
    ) -> Result<ServiceRequest, Error>;

    /// The requesting user pays the request's fee.
    async fn pay(&self, caller: Caller, id: ServiceRequestId) -> Result<Transaction, Error>;

    /// The requesting user releases a completed, paid request's payment.
    async fn release_payment(
        &self,
        caller: Caller,
        id: ServiceRequestId,
    ) -> Result<ServiceRequest, Error>;
}

/// Domain use-case port for lifecycle reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceRequestsQuery: Send + Sync {
    /// Every stored request, unscoped.
    async fn list_all(&self) -> Result<Vec<ServiceRequest>, Error>;

    /// Requests assigned to `nurse_id`; `not_found` when there are none.
    async fn list_for_nurse(&self, nurse_id: NurseId) -> Result<Vec<ServiceRequest>, Error>;

    /// A single request, visible to its parties only.
    async fn get(&self, caller: Caller, id: ServiceRequestId) -> Result<ServiceRequest, Error>;
}
