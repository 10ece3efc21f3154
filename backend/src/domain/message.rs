//! Messages exchanged between the parties of a service request.
//!
//! Messages are append-only and ordered by their creation timestamp.

use chrono::{DateTime, Utc};
use pagination::ItemsKey;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{MessageId, ServiceRequestId};

/// A stored message. Sender and receiver are raw identity ids because either
/// may be a user or a nurse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Message {
    pub id: MessageId,
    pub service_request_id: ServiceRequestId,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ItemsKey for Message {
    const ITEMS_KEY: &'static str = "messages";
}

/// Validated send payload; the sender is always the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub service_request_id: ServiceRequestId,
    pub receiver_id: Uuid,
    pub content: String,
}
