//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed entities of the care marketplace and
//! the services that enforce its rules. Nothing here imports HTTP or SQL
//! types; adapters reach the domain through [`ports`].
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.
//! - Identity types: [`Identity`], [`UserProfile`], [`NurseProfile`],
//!   [`Caller`], [`Role`].
//! - Lifecycle: [`ServiceRequest`], [`Estado`].
//! - Dependent resources: [`Message`], [`Review`], [`Transaction`],
//!   [`Patient`], [`SupportRequest`], [`Faq`].
//! - Services: one per area, each implementing the matching driving ports.

pub mod auth;
pub mod error;
pub mod identity;
pub mod ids;
pub mod message;
pub mod patient;
pub mod ports;
pub mod review;
pub mod service_request;
pub mod support;
pub mod trace_id;
pub mod transaction;

mod account_service;
mod message_service;
mod patient_service;
mod repository_errors;
mod review_service;
mod service_request_service;
mod support_service;
mod transaction_service;

pub use self::account_service::AccountService;
pub use self::auth::{AuthError, Caller, IssuedToken, LoginCredentials, LoginValidationError, Role};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::{
    AvailabilitySlot, Identity, NewNurse, NewUser, NurseAccount, NurseProfile, NurseSearch,
    NurseUpdate, PasswordHash, UserAccount, UserProfile, UserUpdate,
};
pub use self::ids::{
    FaqId, MessageId, NurseId, PatientId, ReviewId, ServiceRequestId, SupportRequestId,
    TransactionId, UserId,
};
pub use self::message::{Message, NewMessage};
pub use self::message_service::MessageService;
pub use self::patient::{NewPatient, Patient, PatientUpdate};
pub use self::patient_service::PatientService;
pub use self::review::{NewReview, Rating, RatingOutOfRange, Review};
pub use self::review_service::ReviewService;
pub use self::service_request::{Estado, NewServiceRequest, ServiceRequest};
pub use self::service_request_service::ServiceRequestService;
pub use self::support::{Faq, NewSupportRequest, SupportRequest};
pub use self::support_service::SupportService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::transaction::{Invoice, Transaction};
pub use self::transaction_service::TransactionService;

/// Convenient result alias for domain operations.
///
/// # Examples
/// ```
/// use carematch::domain::{ApiResult, Error};
///
/// fn guard() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(guard().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
