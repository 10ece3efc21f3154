//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod error;
pub mod health;
pub mod messages;
pub mod nurses;
pub mod patients;
pub mod reviews;
pub mod schemas;
pub mod service_requests;
pub mod state;
pub mod support;
#[cfg(test)]
pub mod test_utils;
pub mod transactions;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every API handler on `cfg`.
///
/// Handlers expect [`state::HttpState`] as application data. Health probes
/// are registered separately because they need their own state.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register_user)
        .service(users::login_user)
        .service(users::panel)
        .service(users::current_user)
        .service(users::update_current_user)
        .service(users::list_users)
        .service(nurses::register_nurse)
        .service(nurses::login_nurse)
        .service(nurses::search_nurses)
        .service(nurses::current_nurse)
        .service(nurses::update_current_nurse)
        .service(nurses::list_nurses)
        .service(patients::create_patient)
        .service(patients::list_patients)
        .service(patients::update_patient)
        .service(patients::delete_patient)
        .service(service_requests::list_service_requests)
        .service(service_requests::create_service_request)
        .service(service_requests::list_for_nurse)
        .service(service_requests::get_service_request)
        .service(service_requests::transition_service_request)
        .service(service_requests::pay_service_request)
        .service(service_requests::release_payment)
        .service(messages::send_message)
        .service(messages::message_history)
        .service(reviews::create_review)
        .service(reviews::list_reviews)
        .service(transactions::list_transactions)
        .service(transactions::issue_invoice)
        .service(support::list_faqs)
        .service(support::open_support_request);
}
