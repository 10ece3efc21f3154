//! Builders wiring Diesel repositories into domain services and HTTP state.
//!
//! Each domain service implements both halves of its command/query port
//! pair, so one `Arc` is shared between the two `HttpState` slots.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use carematch::domain::ports::{PasswordHasher, TokenService};
use carematch::domain::{
    AccountService, MessageService, PatientService, ReviewService, ServiceRequestService,
    SupportService, TransactionService,
};
use carematch::inbound::http::state::{AccountPorts, CarePorts, HttpState};
use carematch::outbound::persistence::{
    DbPool, DieselMessageRepository, DieselNurseRepository, DieselPatientRepository,
    DieselReviewRepository, DieselServiceRequestRepository, DieselSupportRepository,
    DieselTransactionRepository, DieselUserRepository,
};
use carematch::outbound::security::{Argon2PasswordHasher, JwtTokenService};

use super::ServerConfig;

fn build_account_ports(pool: &DbPool, tokens: Arc<dyn TokenService>) -> AccountPorts {
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher);
    let accounts = Arc::new(AccountService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselNurseRepository::new(pool.clone())),
        hasher,
        tokens.clone(),
    ));
    AccountPorts {
        tokens,
        login: accounts.clone(),
        accounts: accounts.clone(),
        accounts_query: accounts,
    }
}

fn build_care_ports(pool: &DbPool, clock: &Arc<dyn Clock>) -> CarePorts {
    let requests = Arc::new(DieselServiceRequestRepository::new(pool.clone()));
    let transactions = Arc::new(DieselTransactionRepository::new(pool.clone()));

    let patients = Arc::new(PatientService::new(Arc::new(
        DieselPatientRepository::new(pool.clone()),
    )));
    let lifecycle = Arc::new(ServiceRequestService::new(
        requests.clone(),
        transactions.clone(),
        clock.clone(),
    ));
    let messages = Arc::new(MessageService::new(
        Arc::new(DieselMessageRepository::new(pool.clone())),
        requests.clone(),
        clock.clone(),
    ));
    let reviews = Arc::new(ReviewService::new(
        Arc::new(DieselReviewRepository::new(pool.clone())),
        requests,
        clock.clone(),
    ));
    let ledger = Arc::new(TransactionService::new(transactions, clock.clone()));
    let support = Arc::new(SupportService::new(
        Arc::new(DieselSupportRepository::new(pool.clone())),
        clock.clone(),
    ));

    CarePorts {
        patients: patients.clone(),
        patients_query: patients,
        service_requests: lifecycle.clone(),
        service_requests_query: lifecycle,
        messages: messages.clone(),
        messages_query: messages,
        reviews: reviews.clone(),
        reviews_query: reviews,
        transactions: ledger.clone(),
        invoices: ledger,
        support: support.clone(),
        faqs: support,
    }
}

/// Build the shared HTTP state over the configured database pool.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(
        &config.jwt_secret,
        config.token_ttl,
        clock.clone(),
    ));
    web::Data::new(HttpState::new(
        build_account_ports(&config.db_pool, tokens),
        build_care_ports(&config.db_pool, &clock),
    ))
}
