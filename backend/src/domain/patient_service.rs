//! Patient management service.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageWindow};
use tracing::debug;

use super::ports::{PatientRepository, PatientsCommand, PatientsQuery};
use super::repository_errors::map_patient_error;
use super::{Caller, Error, NewPatient, Patient, PatientId, PatientUpdate, UserId};

/// Patient service implementing the patient driving ports.
#[derive(Clone)]
pub struct PatientService<R> {
    patients: Arc<R>,
}

impl<R> PatientService<R> {
    /// Create the service over a patient repository.
    pub fn new(patients: Arc<R>) -> Self {
        Self { patients }
    }
}

impl<R> PatientService<R>
where
    R: PatientRepository,
{
    async fn load_owned(&self, caller: &Caller, id: PatientId) -> Result<Patient, Error> {
        let patient = self
            .patients
            .find_by_id(&id)
            .await
            .map_err(map_patient_error)?
            .ok_or_else(|| Error::not_found(format!("patient {id} not found")))?;
        patient.ensure_owner(caller).inspect_err(|_| {
            debug!(patient_id = %id, caller = %caller.id(), "patient access denied");
        })?;
        Ok(patient)
    }
}

#[async_trait]
impl<R> PatientsCommand for PatientService<R>
where
    R: PatientRepository,
{
    async fn create(&self, new: NewPatient) -> Result<Patient, Error> {
        let patient = Patient::create(PatientId::random(), new);
        self.patients
            .insert(&patient)
            .await
            .map_err(map_patient_error)?;
        Ok(patient)
    }

    async fn update(
        &self,
        caller: Caller,
        id: PatientId,
        update: PatientUpdate,
    ) -> Result<Patient, Error> {
        let mut patient = self.load_owned(&caller, id).await?;
        patient.apply(update);
        let updated = self
            .patients
            .update(&patient)
            .await
            .map_err(map_patient_error)?;
        if !updated {
            return Err(Error::not_found(format!("patient {id} not found")));
        }
        Ok(patient)
    }

    async fn delete(&self, caller: Caller, id: PatientId) -> Result<(), Error> {
        self.load_owned(&caller, id).await?;
        let deleted = self
            .patients
            .delete(&id)
            .await
            .map_err(map_patient_error)?;
        if !deleted {
            return Err(Error::not_found(format!("patient {id} not found")));
        }
        Ok(())
    }
}

#[async_trait]
impl<R> PatientsQuery for PatientService<R>
where
    R: PatientRepository,
{
    async fn list_for_owner(
        &self,
        owner: UserId,
        window: PageWindow,
    ) -> Result<Page<Patient>, Error> {
        self.patients
            .list_for_owner(&owner, window)
            .await
            .map_err(map_patient_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockPatientRepository;
    use crate::domain::{ErrorCode, Role};
    use rstest::{fixture, rstest};

    #[fixture]
    fn owner() -> UserId {
        UserId::random()
    }

    fn stored(owner: UserId) -> Patient {
        Patient::create(
            PatientId::random(),
            NewPatient {
                usuario_id: owner,
                name: "Carmen".to_owned(),
                fecha_nacimiento: "1940-05-01".to_owned(),
                genero: "F".to_owned(),
                movilidad: "andador".to_owned(),
                descripcion: "hipertensión".to_owned(),
            },
        )
    }

    #[rstest]
    #[tokio::test]
    async fn non_owner_cannot_delete(owner: UserId) {
        let patient = stored(owner);
        let id = patient.id;
        let mut repo = MockPatientRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(patient)));
        repo.expect_delete().times(0);

        let stranger = Caller::new(uuid::Uuid::new_v4(), Role::User);
        let err = PatientService::new(Arc::new(repo))
            .delete(stranger, id)
            .await
            .expect_err("not the owner");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_patient_is_not_found(owner: UserId) {
        let mut repo = MockPatientRepository::new();
        repo.expect_find_by_id().times(1).return_once(|_| Ok(None));

        let caller = Caller::new(*owner.as_uuid(), Role::User);
        let err = PatientService::new(Arc::new(repo))
            .update(caller, PatientId::random(), PatientUpdate::default())
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn owner_update_is_persisted(owner: UserId) {
        let patient = stored(owner);
        let id = patient.id;
        let mut repo = MockPatientRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(patient)));
        repo.expect_update()
            .withf(|patient| patient.movilidad == "silla de ruedas")
            .times(1)
            .return_once(|_| Ok(true));

        let caller = Caller::new(*owner.as_uuid(), Role::User);
        let updated = PatientService::new(Arc::new(repo))
            .update(
                caller,
                id,
                PatientUpdate {
                    movilidad: Some("silla de ruedas".to_owned()),
                    ..PatientUpdate::default()
                },
            )
            .await
            .expect("owner may update");
        assert_eq!(updated.usuario_id, owner);
    }
}
