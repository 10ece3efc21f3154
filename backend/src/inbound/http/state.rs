//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountsCommand, AccountsQuery, FaqQuery, InvoiceCommand, LoginService, MessagesCommand,
    MessagesQuery, PatientsCommand, PatientsQuery, ReviewsCommand, ReviewsQuery,
    ServiceRequestsCommand, ServiceRequestsQuery, SupportCommand, TokenService,
    TransactionsQuery,
};

/// Identity and token ports.
#[derive(Clone)]
pub struct AccountPorts {
    pub tokens: Arc<dyn TokenService>,
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountsCommand>,
    pub accounts_query: Arc<dyn AccountsQuery>,
}

/// Ports for service requests and the resources hanging off them.
#[derive(Clone)]
pub struct CarePorts {
    pub patients: Arc<dyn PatientsCommand>,
    pub patients_query: Arc<dyn PatientsQuery>,
    pub service_requests: Arc<dyn ServiceRequestsCommand>,
    pub service_requests_query: Arc<dyn ServiceRequestsQuery>,
    pub messages: Arc<dyn MessagesCommand>,
    pub messages_query: Arc<dyn MessagesQuery>,
    pub reviews: Arc<dyn ReviewsCommand>,
    pub reviews_query: Arc<dyn ReviewsQuery>,
    pub transactions: Arc<dyn TransactionsQuery>,
    pub invoices: Arc<dyn InvoiceCommand>,
    pub support: Arc<dyn SupportCommand>,
    pub faqs: Arc<dyn FaqQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub tokens: Arc<dyn TokenService>,
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountsCommand>,
    pub accounts_query: Arc<dyn AccountsQuery>,
    pub patients: Arc<dyn PatientsCommand>,
    pub patients_query: Arc<dyn PatientsQuery>,
    pub service_requests: Arc<dyn ServiceRequestsCommand>,
    pub service_requests_query: Arc<dyn ServiceRequestsQuery>,
    pub messages: Arc<dyn MessagesCommand>,
    pub messages_query: Arc<dyn MessagesQuery>,
    pub reviews: Arc<dyn ReviewsCommand>,
    pub reviews_query: Arc<dyn ReviewsQuery>,
    pub transactions: Arc<dyn TransactionsQuery>,
    pub invoices: Arc<dyn InvoiceCommand>,
    pub support: Arc<dyn SupportCommand>,
    pub faqs: Arc<dyn FaqQuery>,
}

impl HttpState {
    /// Construct state from the account and care port bundles.
    ///
    /// # Examples
    /// ```no_run
    /// use carematch::inbound::http::state::{AccountPorts, CarePorts, HttpState};
    ///
    /// fn wire(accounts: AccountPorts, care: CarePorts) -> HttpState {
    ///     HttpState::new(accounts, care)
    /// }
    /// ```
    pub fn new(accounts: AccountPorts, care: CarePorts) -> Self {
        let AccountPorts {
            tokens,
            login,
            accounts,
            accounts_query,
        } = accounts;
        let CarePorts {
            patients,
            patients_query,
            service_requests,
            service_requests_query,
            messages,
            messages_query,
            reviews,
            reviews_query,
            transactions,
            invoices,
            support,
            faqs,
        } = care;
        Self {
            tokens,
            login,
            accounts,
            accounts_query,
            patients,
            patients_query,
            service_requests,
            service_requests_query,
            messages,
            messages_query,
            reviews,
            reviews_query,
            transactions,
            invoices,
            support,
            faqs,
        }
    }
}
