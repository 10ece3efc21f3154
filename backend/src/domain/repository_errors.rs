//! Translation of driven-port failures into domain errors.
//!
//! Connection failures become `service_unavailable`; query failures become
//! `internal_error`. The adapter message is logged here and kept on the
//! error for diagnostics; the HTTP layer redacts internal errors.

use tracing::error;

use super::Error;
use super::ports::{
    MessageRepositoryError, NurseRepositoryError, PasswordHasherError, PatientRepositoryError,
    ReviewRepositoryError, ServiceRequestRepositoryError, SupportRepositoryError,
    TokenServiceError, TransactionRepositoryError, UserRepositoryError,
};

fn unavailable(store: &str, message: &str) -> Error {
    error!(store, %message, "storage connection failed");
    Error::service_unavailable(format!("{store} unavailable: {message}"))
}

fn failed(store: &str, message: &str) -> Error {
    error!(store, %message, "storage query failed");
    Error::internal(format!("{store} error: {message}"))
}

pub(crate) fn map_user_error(err: UserRepositoryError) -> Error {
    match err {
        UserRepositoryError::Connection { message } => unavailable("user repository", &message),
        UserRepositoryError::Query { message } => failed("user repository", &message),
        UserRepositoryError::DuplicateUserName { user_name } => {
            Error::conflict(format!("user name {user_name} is already registered"))
        }
    }
}

pub(crate) fn map_nurse_error(err: NurseRepositoryError) -> Error {
    match err {
        NurseRepositoryError::Connection { message } => unavailable("nurse repository", &message),
        NurseRepositoryError::Query { message } => failed("nurse repository", &message),
        NurseRepositoryError::DuplicateUserName { user_name } => {
            Error::conflict(format!("user name {user_name} is already registered"))
        }
    }
}

pub(crate) fn map_patient_error(err: PatientRepositoryError) -> Error {
    match err {
        PatientRepositoryError::Connection { message } => {
            unavailable("patient repository", &message)
        }
        PatientRepositoryError::Query { message } => failed("patient repository", &message),
    }
}

pub(crate) fn map_service_request_error(err: ServiceRequestRepositoryError) -> Error {
    match err {
        ServiceRequestRepositoryError::Connection { message } => {
            unavailable("service request repository", &message)
        }
        ServiceRequestRepositoryError::Query { message } => {
            failed("service request repository", &message)
        }
    }
}

pub(crate) fn map_message_error(err: MessageRepositoryError) -> Error {
    match err {
        MessageRepositoryError::Connection { message } => {
            unavailable("message repository", &message)
        }
        MessageRepositoryError::Query { message } => failed("message repository", &message),
    }
}

pub(crate) fn map_review_error(err: ReviewRepositoryError) -> Error {
    match err {
        ReviewRepositoryError::Connection { message } => unavailable("review repository", &message),
        ReviewRepositoryError::Query { message } => failed("review repository", &message),
        ReviewRepositoryError::Duplicate { .. } => {
            Error::conflict("this service request has already been reviewed")
        }
    }
}

pub(crate) fn map_transaction_error(err: TransactionRepositoryError) -> Error {
    match err {
        TransactionRepositoryError::Connection { message } => {
            unavailable("transaction repository", &message)
        }
        TransactionRepositoryError::Query { message } => {
            failed("transaction repository", &message)
        }
        TransactionRepositoryError::Duplicate { .. } => {
            Error::conflict("service request has already been paid")
        }
    }
}

pub(crate) fn map_support_error(err: SupportRepositoryError) -> Error {
    match err {
        SupportRepositoryError::Connection { message } => {
            unavailable("support repository", &message)
        }
        SupportRepositoryError::Query { message } => failed("support repository", &message),
    }
}

pub(crate) fn map_hasher_error(err: PasswordHasherError) -> Error {
    error!(error = %err, "password hashing failed");
    Error::internal(err.to_string())
}

pub(crate) fn map_token_error(err: TokenServiceError) -> Error {
    error!(error = %err, "token signing failed");
    Error::internal(err.to_string())
}
