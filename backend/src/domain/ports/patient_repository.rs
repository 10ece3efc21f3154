//! Port for patient persistence.

use async_trait::async_trait;
use pagination::{Page, PageWindow};

use crate::domain::{Patient, PatientId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by patient repository adapters.
    pub enum PatientRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "patient repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "patient repository query failed: {message}",
    }
}

/// Port for reading and writing patients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// Insert a new patient.
    async fn insert(&self, patient: &Patient) -> Result<(), PatientRepositoryError>;

    /// Lookup by id.
    async fn find_by_id(&self, id: &PatientId) -> Result<Option<Patient>, PatientRepositoryError>;

    /// Overwrite an existing patient. Returns `false` when it no longer exists.
    async fn update(&self, patient: &Patient) -> Result<bool, PatientRepositoryError>;

    /// Delete by id. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &PatientId) -> Result<bool, PatientRepositoryError>;

    /// One page of the patients owned by `owner`, in creation order.
    async fn list_for_owner(
        &self,
        owner: &UserId,
        window: PageWindow,
    ) -> Result<Page<Patient>, PatientRepositoryError>;
}

/// Fixture implementation for tests that do not exercise patient persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePatientRepository;

#[async_trait]
impl PatientRepository for FixturePatientRepository {
    async fn insert(&self, _patient: &Patient) -> Result<(), PatientRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &PatientId) -> Result<Option<Patient>, PatientRepositoryError> {
        Ok(None)
    }

    async fn update(&self, _patient: &Patient) -> Result<bool, PatientRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _id: &PatientId) -> Result<bool, PatientRepositoryError> {
        Ok(false)
    }

    async fn list_for_owner(
        &self,
        _owner: &UserId,
        window: PageWindow,
    ) -> Result<Page<Patient>, PatientRepositoryError> {
        Ok(Page::new(window, 0, Vec::new()))
    }
}
