//! OpenAPI schema definitions for types that do not derive `ToSchema`.
//!
//! The domain error and the `pagination` envelope stay free of utoipa. This
//! module mirrors their wire shape so handlers can document responses.

use utoipa::ToSchema;

use crate::domain::{Faq, Message, NurseProfile, Patient, Review, Transaction, UserProfile};

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Token rejected, or the caller may not perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A uniqueness rule was violated.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "estado must be one of pendiente, en_progreso, completado")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

macro_rules! page_schema {
    ($(#[$meta:meta])* $name:ident, $item:ty, $key:ident) => {
        $(#[$meta])*
        #[derive(ToSchema)]
        #[expect(
            dead_code,
            reason = "Used only for OpenAPI schema generation via utoipa"
        )]
        pub struct $name {
            /// Number of matching items across all pages.
            total: u64,
            /// One-based page number that was served.
            page: u64,
            /// Page size that was applied.
            limit: u64,
            $key: Vec<$item>,
        }
    };
}

page_schema!(
    /// One page of the user directory.
    UserPageSchema,
    UserProfile,
    users
);
page_schema!(
    /// One page of the nurse directory.
    NursePageSchema,
    NurseProfile,
    nurses
);
page_schema!(
    /// One page of a user's patients.
    PatientPageSchema,
    Patient,
    patients
);
page_schema!(
    /// One page of a message history, oldest first.
    MessagePageSchema,
    Message,
    messages
);
page_schema!(
    /// One page of a nurse's reviews, newest first.
    ReviewPageSchema,
    Review,
    reviews
);
page_schema!(
    /// One page of a nurse's transactions, newest first.
    TransactionPageSchema,
    Transaction,
    transactions
);
page_schema!(
    /// One page of frequently asked questions.
    FaqPageSchema,
    Faq,
    faqs
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_variants_match_domain() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn error_schema_uses_wire_field_names() {
        let schema_json = schema_to_json::<ErrorSchema>();
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(schema_json.contains("traceId"));
        assert!(!schema_json.contains("trace_id"));
    }

    #[rstest]
    #[case(schema_to_json::<UserPageSchema>(), "users")]
    #[case(schema_to_json::<NursePageSchema>(), "nurses")]
    #[case(schema_to_json::<PatientPageSchema>(), "patients")]
    #[case(schema_to_json::<MessagePageSchema>(), "messages")]
    #[case(schema_to_json::<ReviewPageSchema>(), "reviews")]
    #[case(schema_to_json::<TransactionPageSchema>(), "transactions")]
    #[case(schema_to_json::<FaqPageSchema>(), "faqs")]
    fn page_schemas_carry_their_items_key(#[case] schema_json: String, #[case] key: &str) {
        assert!(schema_json.contains(&format!("\"{key}\"")), "missing {key}");
        assert!(schema_json.contains("\"total\""));
    }
}
