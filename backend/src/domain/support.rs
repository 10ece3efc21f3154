//! Help-desk tickets and the public FAQ.

use chrono::{DateTime, Utc};
use pagination::ItemsKey;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{FaqId, Role, SupportRequestId};

/// Status given to newly opened tickets.
pub const PENDING_STATUS: &str = "pendiente";

/// A ticket opened by a user or nurse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SupportRequest {
    pub id: SupportRequestId,
    pub user_id: Uuid,
    pub tipo_usuario: Role,
    pub asunto: String,
    pub mensaje: String,
    pub estado: String,
    pub created_at: DateTime<Utc>,
}

/// Validated ticket payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSupportRequest {
    pub asunto: String,
    pub mensaje: String,
}

/// A frequently asked question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Faq {
    pub id: FaqId,
    pub pregunta: String,
    pub respuesta: String,
}

impl ItemsKey for Faq {
    const ITEMS_KEY: &'static str = "faqs";
}
