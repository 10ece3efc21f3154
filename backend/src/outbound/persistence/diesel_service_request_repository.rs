//! PostgreSQL-backed `ServiceRequestRepository` implementation.
//!
//! Updates overwrite the lifecycle and payment columns without a revision
//! check; concurrent writers resolve as last write wins.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ServiceRequestRepository, ServiceRequestRepositoryError};
use crate::domain::{Estado, NurseId, PatientId, ServiceRequest, ServiceRequestId, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ServiceRequestChangeset, ServiceRequestRow};
use super::pool::DbPool;
use super::schema::service_requests;

/// Diesel implementation of the [`ServiceRequestRepository`] port.
#[derive(Clone)]
pub struct DieselServiceRequestRepository {
    pool: DbPool,
}

impl DieselServiceRequestRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn request_row(request: &ServiceRequest) -> ServiceRequestRow {
    ServiceRequestRow {
        id: *request.id.as_uuid(),
        user_id: *request.user_id.as_uuid(),
        nurse_id: *request.nurse_id.as_uuid(),
        patient_ids: request.patient_ids.iter().map(|id| *id.as_uuid()).collect(),
        estado: request.estado.as_str().to_owned(),
        detalles: request.detalles.clone(),
        fecha: request.fecha,
        tarifa: request.tarifa,
        pago_realizado: request.pago_realizado,
        pago_liberado: request.pago_liberado,
        created_at: request.created_at,
        updated_at: request.updated_at,
    }
}

fn row_to_request(row: ServiceRequestRow) -> Result<ServiceRequest, ServiceRequestRepositoryError> {
    let estado: Estado = row.estado.parse().map_err(|()| {
        ServiceRequestRepositoryError::query(format!(
            "service request {} has unknown estado {:?}",
            row.id, row.estado
        ))
    })?;
    Ok(ServiceRequest {
        id: ServiceRequestId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        nurse_id: NurseId::from_uuid(row.nurse_id),
        patient_ids: row.patient_ids.into_iter().map(PatientId::from_uuid).collect(),
        estado,
        detalles: row.detalles,
        fecha: row.fecha,
        tarifa: row.tarifa,
        pago_realizado: row.pago_realizado,
        pago_liberado: row.pago_liberado,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn rows_to_requests(
    rows: Vec<ServiceRequestRow>,
) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError> {
    rows.into_iter().map(row_to_request).collect()
}

#[async_trait]
impl ServiceRequestRepository for DieselServiceRequestRepository {
    async fn insert(&self, request: &ServiceRequest) -> Result<(), ServiceRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(service_requests::table)
            .values(request_row(request))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &ServiceRequestId,
    ) -> Result<Option<ServiceRequest>, ServiceRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ServiceRequestRow> = service_requests::table
            .find(id.as_uuid())
            .select(ServiceRequestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_request).transpose()
    }

    async fn update(
        &self,
        request: &ServiceRequest,
    ) -> Result<bool, ServiceRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ServiceRequestChangeset {
            estado: request.estado.as_str(),
            pago_realizado: request.pago_realizado,
            pago_liberado: request.pago_liberado,
            updated_at: request.updated_at,
        };
        let updated = diesel::update(service_requests::table.find(request.id.as_uuid()))
            .set(changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn list_all(&self) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ServiceRequestRow> = service_requests::table
            .order((service_requests::created_at.asc(), service_requests::id.asc()))
            .select(ServiceRequestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_requests(rows)
    }

    async fn list_for_nurse(
        &self,
        nurse_id: &NurseId,
    ) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ServiceRequestRow> = service_requests::table
            .filter(service_requests::nurse_id.eq(nurse_id.as_uuid()))
            .order((service_requests::created_at.asc(), service_requests::id.asc()))
            .select(ServiceRequestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_requests(rows)
    }
}
