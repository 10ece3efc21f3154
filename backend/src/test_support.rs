//! Test utilities for the carematch crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is compiled for tests and behind the
//! `test-support` feature.

mod clock;
mod memory;

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::FixturePasswordHasher;
use crate::domain::{
    AccountService, Faq, MessageService, PatientService, ReviewService, ServiceRequestService,
    SupportService, TransactionService,
};
use crate::inbound::http::state::{AccountPorts, CarePorts, HttpState};
use crate::outbound::security::JwtTokenService;

pub use clock::MutableClock;
pub use memory::{
    InMemoryMessageRepository, InMemoryNurseRepository, InMemoryPatientRepository,
    InMemoryReviewRepository, InMemoryServiceRequestRepository, InMemorySupportRepository,
    InMemoryTransactionRepository, InMemoryUserRepository,
};

/// Signing secret used by [`InMemoryApp`].
pub const TEST_JWT_SECRET: &[u8] = b"carematch-test-secret";

/// Token lifetime used by [`InMemoryApp`].
pub const TEST_TOKEN_TTL_SECS: i64 = 3600;

/// Fixed instant that test clocks start from.
pub fn test_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("fixed test epoch is unambiguous"))
}

/// Fully wired HTTP state over in-memory repositories.
///
/// Passwords use the reversible fixture hasher; tokens are real HS256 JWTs
/// signed with [`TEST_JWT_SECRET`] against the shared [`MutableClock`].
pub struct InMemoryApp {
    pub clock: Arc<MutableClock>,
    pub support: Arc<InMemorySupportRepository>,
    pub state: HttpState,
}

impl InMemoryApp {
    /// Wire every service with empty repositories.
    pub fn new() -> Self {
        Self::with_faqs(Vec::new())
    }

    /// Wire every service with the FAQ list pre-populated.
    pub fn with_faqs(faqs: Vec<Faq>) -> Self {
        let clock = Arc::new(MutableClock::new(test_epoch()));
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let tokens = Arc::new(JwtTokenService::new(
            TEST_JWT_SECRET,
            TimeDelta::seconds(TEST_TOKEN_TTL_SECS),
            dyn_clock.clone(),
        ));

        let requests = Arc::new(InMemoryServiceRequestRepository::default());
        let transactions = Arc::new(InMemoryTransactionRepository::default());
        let support = Arc::new(InMemorySupportRepository::with_faqs(faqs));

        let accounts = Arc::new(AccountService::new(
            Arc::new(InMemoryUserRepository::default()),
            Arc::new(InMemoryNurseRepository::default()),
            Arc::new(FixturePasswordHasher),
            tokens.clone(),
        ));
        let patients = Arc::new(PatientService::new(Arc::new(
            InMemoryPatientRepository::default(),
        )));
        let lifecycle = Arc::new(ServiceRequestService::new(
            requests.clone(),
            transactions.clone(),
            dyn_clock.clone(),
        ));
        let messages = Arc::new(MessageService::new(
            Arc::new(InMemoryMessageRepository::default()),
            requests.clone(),
            dyn_clock.clone(),
        ));
        let reviews = Arc::new(ReviewService::new(
            Arc::new(InMemoryReviewRepository::default()),
            requests,
            dyn_clock.clone(),
        ));
        let ledger = Arc::new(TransactionService::new(transactions, dyn_clock.clone()));
        let help = Arc::new(SupportService::new(support.clone(), dyn_clock));

        let state = HttpState::new(
            AccountPorts {
                tokens,
                login: accounts.clone(),
                accounts: accounts.clone(),
                accounts_query: accounts,
            },
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
                support: help.clone(),
                faqs: help,
            },
        );

        Self {
            clock,
            support,
            state,
        }
    }
}

impl Default for InMemoryApp {
    fn default() -> Self {
        Self::new()
    }
}
