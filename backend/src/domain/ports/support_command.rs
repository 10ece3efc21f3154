//! Driving ports for the help desk.

use async_trait::async_trait;
use pagination::{Page, PageWindow};

use crate::domain::{Caller, Error, Faq, NewSupportRequest, SupportRequest};

/// Domain use-case port for opening tickets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SupportCommand: Send + Sync {
    /// Open a ticket on behalf of `caller`.
    async fn open(&self, caller: Caller, new: NewSupportRequest) -> Result<SupportRequest, Error>;
}

/// Domain use-case port for the public FAQ.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FaqQuery: Send + Sync {
    /// One page of FAQ entries.
    async fn list_faqs(&self, window: PageWindow) -> Result<Page<Faq>, Error>;
}
