//! Shared Diesel error mapping for the repository adapters.
//!
//! Pool checkout failures and closed connections become connection errors;
//! unique violations become the port's duplicate error where it has one;
//! everything else is a query error carrying the database message.

use tracing::debug;

use crate::domain::ports::{
    MessageRepositoryError, NurseRepositoryError, PatientRepositoryError, ReviewRepositoryError,
    ServiceRequestRepositoryError, SupportRepositoryError, TransactionRepositoryError,
    UserRepositoryError,
};

use super::pool::PoolError;

/// Port errors that a Diesel failure can be translated into.
pub(crate) trait StoreError: Sized {
    fn connection(message: String) -> Self;

    fn query(message: String) -> Self;

    fn unique_violation(message: String) -> Self {
        Self::query(message)
    }
}

/// Map pool errors into the port's connection error.
pub(crate) fn map_pool_error<E: StoreError>(error: PoolError) -> E {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => E::connection(message),
    }
}

/// Map Diesel errors into the port's error type.
pub(crate) fn map_diesel_error<E: StoreError>(error: diesel::result::Error) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
            let message = info.message().to_owned();
            match kind {
                DatabaseErrorKind::ClosedConnection => E::connection(message),
                DatabaseErrorKind::UniqueViolation => E::unique_violation(
                    info.constraint_name().map_or(message, ToOwned::to_owned),
                ),
                _ => E::query(message),
            }
        }
        other => {
            debug!(error = %other, "diesel operation failed");
            E::query(other.to_string())
        }
    }
}

macro_rules! store_error {
    ($error:ty) => {
        impl StoreError for $error {
            fn connection(message: String) -> Self {
                <$error>::connection(message)
            }

            fn query(message: String) -> Self {
                <$error>::query(message)
            }
        }
    };
    ($error:ty, unique => $duplicate:expr) => {
        impl StoreError for $error {
            fn connection(message: String) -> Self {
                <$error>::connection(message)
            }

            fn query(message: String) -> Self {
                <$error>::query(message)
            }

            fn unique_violation(message: String) -> Self {
                $duplicate(message)
            }
        }
    };
}

store_error!(UserRepositoryError, unique => UserRepositoryError::duplicate_user_name);
store_error!(NurseRepositoryError, unique => NurseRepositoryError::duplicate_user_name);
store_error!(PatientRepositoryError);
store_error!(ServiceRequestRepositoryError);
store_error!(MessageRepositoryError);
store_error!(ReviewRepositoryError, unique => ReviewRepositoryError::duplicate);
store_error!(TransactionRepositoryError, unique => TransactionRepositoryError::duplicate);
store_error!(SupportRepositoryError);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_are_connection_errors() {
        let err: PatientRepositoryError = map_pool_error(PoolError::checkout("timed out"));
        assert!(matches!(err, PatientRepositoryError::Connection { message } if message == "timed out"));
    }

    #[rstest]
    fn not_found_is_query_error() {
        let err: ReviewRepositoryError = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(err, ReviewRepositoryError::Query { .. }));
    }
}
