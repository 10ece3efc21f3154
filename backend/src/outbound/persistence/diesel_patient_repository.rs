//! PostgreSQL-backed `PatientRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageWindow};

use crate::domain::ports::{PatientRepository, PatientRepositoryError};
use crate::domain::{Patient, PatientId, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::diesel_helpers::{page_bounds, row_count};
use super::models::PatientRow;
use super::pool::DbPool;
use super::schema::patients;

/// Diesel implementation of the [`PatientRepository`] port.
#[derive(Clone)]
pub struct DieselPatientRepository {
    pool: DbPool,
}

impl DieselPatientRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn patient_row(patient: &Patient) -> PatientRow {
    PatientRow {
        id: *patient.id.as_uuid(),
        usuario_id: *patient.usuario_id.as_uuid(),
        name: patient.name.clone(),
        fecha_nacimiento: patient.fecha_nacimiento.clone(),
        genero: patient.genero.clone(),
        movilidad: patient.movilidad.clone(),
        descripcion: patient.descripcion.clone(),
    }
}

fn row_to_patient(row: PatientRow) -> Patient {
    Patient {
        id: PatientId::from_uuid(row.id),
        name: row.name,
        fecha_nacimiento: row.fecha_nacimiento,
        genero: row.genero,
        movilidad: row.movilidad,
        descripcion: row.descripcion,
        usuario_id: UserId::from_uuid(row.usuario_id),
    }
}

#[async_trait]
impl PatientRepository for DieselPatientRepository {
    async fn insert(&self, patient: &Patient) -> Result<(), PatientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(patients::table)
            .values(patient_row(patient))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &PatientId) -> Result<Option<Patient>, PatientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PatientRow> = patients::table
            .find(id.as_uuid())
            .select(PatientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_patient))
    }

    async fn update(&self, patient: &Patient) -> Result<bool, PatientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(patients::table.find(patient.id.as_uuid()))
            .set(patient_row(patient))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &PatientId) -> Result<bool, PatientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(patients::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
        window: PageWindow,
    ) -> Result<Page<Patient>, PatientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (offset, limit) = page_bounds(window);
        let total: i64 = patients::table
            .filter(patients::usuario_id.eq(owner.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<PatientRow> = patients::table
            .filter(patients::usuario_id.eq(owner.as_uuid()))
            .order((patients::created_at.asc(), patients::id.asc()))
            .offset(offset)
            .limit(limit)
            .select(PatientRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Page::new(
            window,
            row_count(total),
            rows.into_iter().map(row_to_patient).collect(),
        ))
    }
}
