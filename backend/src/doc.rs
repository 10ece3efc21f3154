//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST handler, the error and page envelope
//! schemas from [`crate::inbound::http::schemas`], and the `BearerAuth`
//! security scheme. The document backs Swagger UI in debug builds and is
//! printed by `cargo run --bin openapi-dump`.

use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, FaqPageSchema, MessagePageSchema, NursePageSchema,
    PatientPageSchema, ReviewPageSchema, TransactionPageSchema, UserPageSchema,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token issued by POST /users/login or POST /nurses/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "CareMatch backend API",
        description = "Marketplace connecting users who need home care with nurses.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::login_user,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_current_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::panel,
        crate::inbound::http::nurses::register_nurse,
        crate::inbound::http::nurses::login_nurse,
        crate::inbound::http::nurses::current_nurse,
        crate::inbound::http::nurses::update_current_nurse,
        crate::inbound::http::nurses::list_nurses,
        crate::inbound::http::nurses::search_nurses,
        crate::inbound::http::patients::create_patient,
        crate::inbound::http::patients::list_patients,
        crate::inbound::http::patients::update_patient,
        crate::inbound::http::patients::delete_patient,
        crate::inbound::http::service_requests::list_service_requests,
        crate::inbound::http::service_requests::create_service_request,
        crate::inbound::http::service_requests::list_for_nurse,
        crate::inbound::http::service_requests::get_service_request,
        crate::inbound::http::service_requests::transition_service_request,
        crate::inbound::http::service_requests::pay_service_request,
        crate::inbound::http::service_requests::release_payment,
        crate::inbound::http::messages::send_message,
        crate::inbound::http::messages::message_history,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::transactions::list_transactions,
        crate::inbound::http::transactions::issue_invoice,
        crate::inbound::http::support::list_faqs,
        crate::inbound::http::support::open_support_request,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserPageSchema,
        NursePageSchema,
        PatientPageSchema,
        MessagePageSchema,
        ReviewPageSchema,
        TransactionPageSchema,
        FaqPageSchema
    )),
    tags(
        (name = "users", description = "User accounts and profile"),
        (name = "nurses", description = "Nurse accounts, profile and directory search"),
        (name = "patients", description = "Patients cared for on behalf of a user"),
        (name = "service-requests", description = "Care bookings and their payment"),
        (name = "messages", description = "Conversation between the parties of a request"),
        (name = "reviews", description = "Ratings of completed requests"),
        (name = "transactions", description = "Nurse payment ledger and invoices"),
        (name = "support", description = "Support tickets and FAQ"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
