//! Driving ports for service request messaging.

use async_trait::async_trait;
use pagination::{Page, PageWindow};

use crate::domain::{Caller, Error, Message, NewMessage, ServiceRequestId};

/// Domain use-case port for sending messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagesCommand: Send + Sync {
    /// Send a message as `caller`, who must be a party of the request.
    async fn send(&self, caller: Caller, new: NewMessage) -> Result<Message, Error>;
}

/// Domain use-case port for reading message history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagesQuery: Send + Sync {
    /// One page of a request's history, oldest first, for a party.
    async fn history(
        &self,
        caller: Caller,
        service_request_id: ServiceRequestId,
        window: PageWindow,
    ) -> Result<Page<Message>, Error>;
}
