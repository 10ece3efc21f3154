//! Domain ports and supporting types for the hexagonal boundary.
//!
//! *Driving* ports (`*Command`, `*Query`, [`LoginService`]) are implemented
//! by domain services and called by inbound adapters. *Driven* ports
//! (`*Repository`, [`PasswordHasher`], [`TokenService`]) are implemented by
//! outbound adapters and called by domain services.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod message_repository;
mod messages_command;
mod nurse_repository;
mod password_hasher;
mod patient_repository;
mod patients_command;
mod review_repository;
mod reviews_command;
mod service_request_repository;
mod service_requests_command;
mod support_command;
mod support_repository;
mod token_service;
mod transaction_repository;
mod transactions_query;
mod user_repository;

#[cfg(test)]
pub use login_service::{MockAccountsCommand, MockAccountsQuery, MockLoginService};
pub use login_service::{AccountsCommand, AccountsQuery, LoginService, Registered};
#[cfg(test)]
pub use message_repository::MockMessageRepository;
pub use message_repository::{FixtureMessageRepository, MessageRepository, MessageRepositoryError};
#[cfg(test)]
pub use messages_command::{MockMessagesCommand, MockMessagesQuery};
pub use messages_command::{MessagesCommand, MessagesQuery};
#[cfg(test)]
pub use nurse_repository::MockNurseRepository;
pub use nurse_repository::{FixtureNurseRepository, NurseRepository, NurseRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{FixturePasswordHasher, PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use patient_repository::MockPatientRepository;
pub use patient_repository::{FixturePatientRepository, PatientRepository, PatientRepositoryError};
#[cfg(test)]
pub use patients_command::{MockPatientsCommand, MockPatientsQuery};
pub use patients_command::{PatientsCommand, PatientsQuery};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{FixtureReviewRepository, ReviewRepository, ReviewRepositoryError};
#[cfg(test)]
pub use reviews_command::{MockReviewsCommand, MockReviewsQuery};
pub use reviews_command::{ReviewsCommand, ReviewsQuery};
#[cfg(test)]
pub use service_request_repository::MockServiceRequestRepository;
pub use service_request_repository::{
    FixtureServiceRequestRepository, ServiceRequestRepository, ServiceRequestRepositoryError,
};
#[cfg(test)]
pub use service_requests_command::{MockServiceRequestsCommand, MockServiceRequestsQuery};
pub use service_requests_command::{ServiceRequestsCommand, ServiceRequestsQuery};
#[cfg(test)]
pub use support_command::{MockFaqQuery, MockSupportCommand};
pub use support_command::{FaqQuery, SupportCommand};
#[cfg(test)]
pub use support_repository::MockSupportRepository;
pub use support_repository::{FixtureSupportRepository, SupportRepository, SupportRepositoryError};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{FixtureTokenService, TokenService, TokenServiceError};
#[cfg(test)]
pub use transaction_repository::MockTransactionRepository;
pub use transaction_repository::{
    FixtureTransactionRepository, TransactionRepository, TransactionRepositoryError,
};
#[cfg(test)]
pub use transactions_query::{MockInvoiceCommand, MockTransactionsQuery};
pub use transactions_query::{InvoiceCommand, TransactionsQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};
