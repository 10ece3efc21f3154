//! Messaging between the parties of a service request.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageWindow};
use serde_json::json;
use tracing::debug;

use super::ports::{MessageRepository, MessagesCommand, MessagesQuery, ServiceRequestRepository};
use super::repository_errors::{map_message_error, map_service_request_error};
use super::{Caller, Error, Message, MessageId, NewMessage, ServiceRequest, ServiceRequestId};

/// Message service implementing the messaging driving ports.
#[derive(Clone)]
pub struct MessageService<M, S> {
    messages: Arc<M>,
    requests: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<M, S> MessageService<M, S> {
    /// Create the service over message and service request repositories.
    pub fn new(messages: Arc<M>, requests: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            messages,
            requests,
            clock,
        }
    }
}

impl<M, S> MessageService<M, S>
where
    S: ServiceRequestRepository,
{
    /// Load the request only if `caller` is one of its parties. An unknown
    /// request is reported exactly like a foreign one.
    async fn party_request(
        &self,
        caller: &Caller,
        id: ServiceRequestId,
    ) -> Result<ServiceRequest, Error> {
        let request = self
            .requests
            .find_by_id(&id)
            .await
            .map_err(map_service_request_error)?;
        match request {
            Some(request) if request.is_party(caller) => Ok(request),
            _ => {
                debug!(service_request_id = %id, caller = %caller.id(), "message access denied");
                Err(Error::forbidden(
                    "caller is not a party to this service request",
                ))
            }
        }
    }
}

#[async_trait]
impl<M, S> MessagesCommand for MessageService<M, S>
where
    M: MessageRepository,
    S: ServiceRequestRepository,
{
    async fn send(&self, caller: Caller, new: NewMessage) -> Result<Message, Error> {
        let request = self.party_request(&caller, new.service_request_id).await?;
        let receiver_is_party = new.receiver_id == *request.user_id.as_uuid()
            || new.receiver_id == *request.nurse_id.as_uuid();
        if !receiver_is_party {
            return Err(Error::invalid_request(
                "receiver_id must be a party of the service request",
            )
            .with_details(json!({ "field": "receiver_id", "code": "not_a_party" })));
        }

        let message = Message {
            id: MessageId::random(),
            service_request_id: request.id,
            sender_id: caller.id(),
            receiver_id: new.receiver_id,
            content: new.content,
            timestamp: self.clock.utc(),
        };
        self.messages
            .insert(&message)
            .await
            .map_err(map_message_error)?;
        Ok(message)
    }
}

#[async_trait]
impl<M, S> MessagesQuery for MessageService<M, S>
where
    M: MessageRepository,
    S: ServiceRequestRepository,
{
    async fn history(
        &self,
        caller: Caller,
        service_request_id: ServiceRequestId,
        window: PageWindow,
    ) -> Result<Page<Message>, Error> {
        self.party_request(&caller, service_request_id).await?;
        self.messages
            .list_for_request(&service_request_id, window)
            .await
            .map_err(map_message_error)
    }
}
