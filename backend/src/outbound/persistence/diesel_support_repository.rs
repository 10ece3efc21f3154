//! PostgreSQL-backed `SupportRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageWindow};

use crate::domain::ports::{SupportRepository, SupportRepositoryError};
use crate::domain::{Faq, FaqId, SupportRequest};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::diesel_helpers::{page_bounds, row_count};
use super::models::{FaqRow, NewSupportRequestRow};
use super::pool::DbPool;
use super::schema::{faqs, support_requests};

/// Diesel implementation of the [`SupportRepository`] port.
#[derive(Clone)]
pub struct DieselSupportRepository {
    pool: DbPool,
}

impl DieselSupportRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SupportRepository for DieselSupportRepository {
    async fn insert_request(&self, request: &SupportRequest) -> Result<(), SupportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewSupportRequestRow {
            id: *request.id.as_uuid(),
            user_id: request.user_id,
            tipo_usuario: request.tipo_usuario.as_str(),
            asunto: request.asunto.as_str(),
            mensaje: request.mensaje.as_str(),
            estado: request.estado.as_str(),
            created_at: request.created_at,
        };
        diesel::insert_into(support_requests::table)
            .values(row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_faqs(&self, window: PageWindow) -> Result<Page<Faq>, SupportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (offset, limit) = page_bounds(window);
        let total: i64 = faqs::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<FaqRow> = faqs::table
            .order((faqs::created_at.asc(), faqs::id.asc()))
            .offset(offset)
            .limit(limit)
            .select(FaqRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let items = rows
            .into_iter()
            .map(|row| Faq {
                id: FaqId::from_uuid(row.id),
                pregunta: row.pregunta,
                respuesta: row.respuesta,
            })
            .collect();
        Ok(Page::new(window, row_count(total), items))
    }
}
