//! Driving ports for patient management.

use async_trait::async_trait;
use pagination::{Page, PageWindow};

use crate::domain::{Caller, Error, NewPatient, Patient, PatientId, PatientUpdate, UserId};

/// Domain use-case port for patient mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientsCommand: Send + Sync {
    /// Store a new patient for `new.usuario_id`.
    async fn create(&self, new: NewPatient) -> Result<Patient, Error>;

    /// Update a patient owned by the caller.
    async fn update(
        &self,
        caller: Caller,
        id: PatientId,
        update: PatientUpdate,
    ) -> Result<Patient, Error>;

    /// Delete a patient owned by the caller.
    async fn delete(&self, caller: Caller, id: PatientId) -> Result<(), Error>;
}

/// Domain use-case port for patient reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientsQuery: Send + Sync {
    /// One page of the patients owned by `owner`.
    async fn list_for_owner(
        &self,
        owner: UserId,
        window: PageWindow,
    ) -> Result<Page<Patient>, Error>;
}
