//! Message HTTP handlers.
//!
//! ```text
//! POST /messages {"service_request_id":"…","receiver_id":"…","content":"Hola"}
//! GET  /messages/{service_request_id}?page=1&limit=10
//! ```

use actix_web::{HttpResponse, get, post, web};
use pagination::PageParams;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Message, NewMessage, ServiceRequestId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{ErrorSchema, MessagePageSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, required_text};

/// Request body for `POST /messages`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SendMessageRequest {
    #[schema(format = "uuid")]
    pub service_request_id: Option<String>,
    #[schema(format = "uuid")]
    pub receiver_id: Option<String>,
    pub content: Option<String>,
}

impl TryFrom<SendMessageRequest> for NewMessage {
    type Error = Error;

    fn try_from(value: SendMessageRequest) -> Result<Self, Self::Error> {
        let request_field = FieldName::new("service_request_id");
        let receiver_field = FieldName::new("receiver_id");
        let service_request_id = parse_uuid(
            required_text(value.service_request_id, request_field)?,
            request_field,
        )?;
        Ok(Self {
            service_request_id: ServiceRequestId::from_uuid(service_request_id),
            receiver_id: parse_uuid(
                required_text(value.receiver_id, receiver_field)?,
                receiver_field,
            )?,
            content: required_text(value.content, FieldName::new("content"))?,
        })
    }
}

/// Send a message on a service request the caller is party to.
#[utoipa::path(
    post,
    path = "/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message stored", body = Message),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a party", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "sendMessage",
    security(("BearerAuth" = []))
)]
#[post("/messages")]
pub async fn send_message(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<SendMessageRequest>,
) -> ApiResult<HttpResponse> {
    let new_message = NewMessage::try_from(payload.into_inner())?;
    let message = state.messages.send(auth.caller(), new_message).await?;
    Ok(HttpResponse::Created().json(message))
}

/// Page through a service request's messages, oldest first.
#[utoipa::path(
    get,
    path = "/messages/{service_request_id}",
    params(
        ("service_request_id" = String, Path, description = "Service request id"),
        ("page" = Option<i64>, Query, description = "One-based page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Page size, default 10")
    ),
    responses(
        (status = 200, description = "Message history", body = MessagePageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a party", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "messageHistory",
    security(("BearerAuth" = []))
)]
#[get("/messages/{service_request_id}")]
pub async fn message_history(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    query: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(path.into_inner(), FieldName::new("service_request_id"))?;
    let page = state
        .messages_query
        .history(
            auth.caller(),
            ServiceRequestId::from_uuid(id),
            query.window(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(page))
}
