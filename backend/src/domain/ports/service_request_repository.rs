//! Port for service request persistence.

use async_trait::async_trait;

use crate::domain::{NurseId, ServiceRequest, ServiceRequestId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by service request repository adapters.
    pub enum ServiceRequestRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "service request repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "service request repository query failed: {message}",
    }
}

/// Port for reading and writing service requests.
///
/// Updates are last-write-wins: two concurrent read-modify-write cycles on
/// the same request can both succeed, and the later one is kept.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceRequestRepository: Send + Sync {
    /// Insert a new request.
    async fn insert(&self, request: &ServiceRequest) -> Result<(), ServiceRequestRepositoryError>;

    /// Lookup by id.
    async fn find_by_id(
        &self,
        id: &ServiceRequestId,
    ) -> Result<Option<ServiceRequest>, ServiceRequestRepositoryError>;

    /// Overwrite an existing request. Returns `false` when it no longer exists.
    async fn update(&self, request: &ServiceRequest)
    -> Result<bool, ServiceRequestRepositoryError>;

    /// Every stored request in creation order.
    async fn list_all(&self) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError>;

    /// Requests assigned to `nurse_id` in creation order.
    async fn list_for_nurse(
        &self,
        nurse_id: &NurseId,
    ) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError>;
}

/// Fixture implementation for tests that do not exercise request persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureServiceRequestRepository;

#[async_trait]
impl ServiceRequestRepository for FixtureServiceRequestRepository {
    async fn insert(&self, _request: &ServiceRequest) -> Result<(), ServiceRequestRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _id: &ServiceRequestId,
    ) -> Result<Option<ServiceRequest>, ServiceRequestRepositoryError> {
        Ok(None)
    }

    async fn update(
        &self,
        _request: &ServiceRequest,
    ) -> Result<bool, ServiceRequestRepositoryError> {
        Ok(false)
    }

    async fn list_all(&self) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_for_nurse(
        &self,
        _nurse_id: &NurseId,
    ) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError> {
        Ok(Vec::new())
    }
}
