//! Help-desk tickets and FAQ.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageWindow};
use tracing::info;

use super::ports::{FaqQuery, SupportCommand, SupportRepository};
use super::repository_errors::map_support_error;
use super::support::PENDING_STATUS;
use super::{Caller, Error, Faq, NewSupportRequest, SupportRequest, SupportRequestId};

/// Support service implementing the help-desk driving ports.
#[derive(Clone)]
pub struct SupportService<R> {
    support: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> SupportService<R> {
    /// Create the service over a support repository.
    pub fn new(support: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { support, clock }
    }
}

#[async_trait]
impl<R> SupportCommand for SupportService<R>
where
    R: SupportRepository,
{
    async fn open(&self, caller: Caller, new: NewSupportRequest) -> Result<SupportRequest, Error> {
        let request = SupportRequest {
            id: SupportRequestId::random(),
            user_id: caller.id(),
            tipo_usuario: caller.role(),
            asunto: new.asunto,
            mensaje: new.mensaje,
            estado: PENDING_STATUS.to_owned(),
            created_at: self.clock.utc(),
        };
        self.support
            .insert_request(&request)
            .await
            .map_err(map_support_error)?;
        info!(support_request_id = %request.id, role = %request.tipo_usuario, "support request opened");
        Ok(request)
    }
}

#[async_trait]
impl<R> FaqQuery for SupportService<R>
where
    R: SupportRepository,
{
    async fn list_faqs(&self, window: PageWindow) -> Result<Page<Faq>, Error> {
        self.support
            .list_faqs(window)
            .await
            .map_err(map_support_error)
    }
}
