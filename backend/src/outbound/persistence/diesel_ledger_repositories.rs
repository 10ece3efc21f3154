//! PostgreSQL-backed repositories for the resources hanging off a service
//! request: messages, reviews and transactions.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageWindow};

use crate::domain::ports::{
    MessageRepository, MessageRepositoryError, ReviewRepository, ReviewRepositoryError,
    TransactionRepository, TransactionRepositoryError,
};
use crate::domain::{
    Message, MessageId, NurseId, Rating, Review, ReviewId, ServiceRequestId, Transaction,
    TransactionId, UserId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::diesel_helpers::{page_bounds, row_count};
use super::models::{MessageRow, ReviewRow, TransactionRow};
use super::pool::DbPool;
use super::schema::{messages, reviews, transactions};

/// Diesel implementation of the [`MessageRepository`] port.
#[derive(Clone)]
pub struct DieselMessageRepository {
    pool: DbPool,
}

impl DieselMessageRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_message(row: MessageRow) -> Message {
    Message {
        id: MessageId::from_uuid(row.id),
        service_request_id: ServiceRequestId::from_uuid(row.service_request_id),
        sender_id: row.sender_id,
        receiver_id: row.receiver_id,
        content: row.content,
        timestamp: row.created_at,
    }
}

#[async_trait]
impl MessageRepository for DieselMessageRepository {
    async fn insert(&self, message: &Message) -> Result<(), MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = MessageRow {
            id: *message.id.as_uuid(),
            service_request_id: *message.service_request_id.as_uuid(),
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            content: message.content.clone(),
            created_at: message.timestamp,
        };
        diesel::insert_into(messages::table)
            .values(row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_request(
        &self,
        service_request_id: &ServiceRequestId,
        window: PageWindow,
    ) -> Result<Page<Message>, MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (offset, limit) = page_bounds(window);
        let total: i64 = messages::table
            .filter(messages::service_request_id.eq(service_request_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<MessageRow> = messages::table
            .filter(messages::service_request_id.eq(service_request_id.as_uuid()))
            .order((messages::created_at.asc(), messages::id.asc()))
            .offset(offset)
            .limit(limit)
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Page::new(
            window,
            row_count(total),
            rows.into_iter().map(row_to_message).collect(),
        ))
    }
}

/// Diesel implementation of the [`ReviewRepository`] port.
///
/// The `(user_id, service_request_id)` unique constraint surfaces as
/// [`ReviewRepositoryError::Duplicate`].
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_review(row: ReviewRow) -> Result<Review, ReviewRepositoryError> {
    let calificacion = Rating::new(i64::from(row.calificacion))
        .map_err(|err| ReviewRepositoryError::query(format!("review {}: {err}", row.id)))?;
    Ok(Review {
        id: ReviewId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        nurse_id: NurseId::from_uuid(row.nurse_id),
        service_request_id: ServiceRequestId::from_uuid(row.service_request_id),
        calificacion,
        comentario: row.comentario,
        created_at: row.created_at,
    })
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = ReviewRow {
            id: *review.id.as_uuid(),
            user_id: *review.user_id.as_uuid(),
            nurse_id: *review.nurse_id.as_uuid(),
            service_request_id: *review.service_request_id.as_uuid(),
            calificacion: i16::from(review.calificacion.get()),
            comentario: review.comentario.clone(),
            created_at: review.created_at,
        };
        diesel::insert_into(reviews::table)
            .values(row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_nurse(
        &self,
        nurse_id: &NurseId,
        window: PageWindow,
    ) -> Result<Page<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (offset, limit) = page_bounds(window);
        let total: i64 = reviews::table
            .filter(reviews::nurse_id.eq(nurse_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<ReviewRow> = reviews::table
            .filter(reviews::nurse_id.eq(nurse_id.as_uuid()))
            .order((reviews::created_at.desc(), reviews::id.desc()))
            .offset(offset)
            .limit(limit)
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let items = rows
            .into_iter()
            .map(row_to_review)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(window, row_count(total), items))
    }
}

/// Diesel implementation of the [`TransactionRepository`] port.
///
/// The unique constraint on `service_request_id` surfaces as
/// [`TransactionRepositoryError::Duplicate`].
#[derive(Clone)]
pub struct DieselTransactionRepository {
    pool: DbPool,
}

impl DieselTransactionRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_transaction(row: TransactionRow) -> Transaction {
    Transaction {
        id: TransactionId::from_uuid(row.id),
        nurse_id: NurseId::from_uuid(row.nurse_id),
        user_id: UserId::from_uuid(row.user_id),
        service_request_id: ServiceRequestId::from_uuid(row.service_request_id),
        monto: row.monto,
        fecha_pago: row.fecha_pago,
        estado: row.estado,
    }
}

#[async_trait]
impl TransactionRepository for DieselTransactionRepository {
    async fn insert(&self, transaction: &Transaction) -> Result<(), TransactionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = TransactionRow {
            id: *transaction.id.as_uuid(),
            nurse_id: *transaction.nurse_id.as_uuid(),
            user_id: *transaction.user_id.as_uuid(),
            service_request_id: *transaction.service_request_id.as_uuid(),
            monto: transaction.monto,
            fecha_pago: transaction.fecha_pago,
            estado: transaction.estado.clone(),
        };
        diesel::insert_into(transactions::table)
            .values(row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_for_request(
        &self,
        service_request_id: &ServiceRequestId,
    ) -> Result<Option<Transaction>, TransactionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TransactionRow> = transactions::table
            .filter(transactions::service_request_id.eq(service_request_id.as_uuid()))
            .select(TransactionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_transaction))
    }

    async fn find_for_nurse(
        &self,
        id: &TransactionId,
        nurse_id: &NurseId,
    ) -> Result<Option<Transaction>, TransactionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TransactionRow> = transactions::table
            .filter(transactions::id.eq(id.as_uuid()))
            .filter(transactions::nurse_id.eq(nurse_id.as_uuid()))
            .select(TransactionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_transaction))
    }

    async fn list_for_nurse(
        &self,
        nurse_id: &NurseId,
        window: PageWindow,
    ) -> Result<Page<Transaction>, TransactionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (offset, limit) = page_bounds(window);
        let total: i64 = transactions::table
            .filter(transactions::nurse_id.eq(nurse_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<TransactionRow> = transactions::table
            .filter(transactions::nurse_id.eq(nurse_id.as_uuid()))
            .order((transactions::fecha_pago.desc(), transactions::id.desc()))
            .offset(offset)
            .limit(limit)
            .select(TransactionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Page::new(
            window,
            row_count(total),
            rows.into_iter().map(row_to_transaction).collect(),
        ))
    }
}
