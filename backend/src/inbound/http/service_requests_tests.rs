//! Tests for service request HTTP handlers.

use super::*;
use crate::inbound::http::test_utils::{bearer, seed_nurse, seed_user, test_app};
use crate::test_support::InMemoryApp;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

struct Parties {
    user_token: String,
    nurse_token: String,
    user_id: UserId,
    nurse_id: NurseId,
}

async fn parties(app: &InMemoryApp) -> Parties {
    let (user_id, user_token) = seed_user(app, "ana").await;
    let (nurse_id, nurse_token) = seed_nurse(app, "marta", "geriatría", 50.0).await;
    Parties {
        user_token,
        nurse_token,
        user_id,
        nurse_id,
    }
}

fn creation(parties: &Parties) -> Value {
    json!({
        "user_id": parties.user_id.to_string(),
        "nurse_id": parties.nurse_id.to_string(),
        "patient_ids": [uuid::Uuid::new_v4().to_string()],
        "estado": "pendiente",
        "detalles": "checkup",
        "fecha": "2024-01-01",
        "tarifa": 50
    })
}

async fn read_json(response: ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}

async fn create<S>(service: &S, parties: &Parties) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri("/service-requests")
        .insert_header(bearer(&parties.user_token))
        .set_json(creation(parties))
        .to_request();
    let response = actix_test::call_service(service, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    body["id"].as_str().expect("id").to_owned()
}

async fn transition<S>(service: &S, token: &str, id: &str, estado: &str) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::put()
        .uri(&format!("/service-requests/{id}/estado"))
        .insert_header(bearer(token))
        .set_json(json!({ "estado": estado }))
        .to_request();
    actix_test::call_service(service, request).await
}

async fn fetch<S>(service: &S, token: &str, id: &str) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::get()
        .uri(&format!("/service-requests/{id}"))
        .insert_header(bearer(token))
        .to_request();
    read_json(actix_test::call_service(service, request).await).await
}

#[actix_web::test]
async fn creation_defaults_payment_flags_and_parses_bare_dates() {
    let app = InMemoryApp::new();
    let parties = parties(&app).await;
    let service = actix_test::init_service(test_app(&app)).await;

    let id = create(&service, &parties).await;
    let body = fetch(&service, &parties.user_token, &id).await;
    assert_eq!(body["estado"], "pendiente");
    assert_eq!(body["pago_realizado"], false);
    assert_eq!(body["pago_liberado"], false);
    assert_eq!(body["fecha"], "2024-01-01T00:00:00Z");
}

#[actix_web::test]
async fn nurse_moves_request_forward_to_completion() {
    let app = InMemoryApp::new();
    let parties = parties(&app).await;
    let service = actix_test::init_service(test_app(&app)).await;
    let id = create(&service, &parties).await;

    for estado in ["en_progreso", "completado"] {
        let response = transition(&service, &parties.nurse_token, &id, estado).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["estado"], estado);
    }
}

#[rstest]
#[case("cancelado")]
#[case("")]
#[case("Pendiente")]
#[actix_web::test]
async fn unknown_state_leaves_request_unchanged(#[case] estado: &str) {
    let app = InMemoryApp::new();
    let parties = parties(&app).await;
    let service = actix_test::init_service(test_app(&app)).await;
    let id = create(&service, &parties).await;

    let response = transition(&service, &parties.nurse_token, &id, estado).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["details"]["field"], "estado");

    let body = fetch(&service, &parties.user_token, &id).await;
    assert_eq!(body["estado"], "pendiente");
}

#[actix_web::test]
async fn completed_requests_cannot_move_back() {
    let app = InMemoryApp::new();
    let parties = parties(&app).await;
    let service = actix_test::init_service(test_app(&app)).await;
    let id = create(&service, &parties).await;

    transition(&service, &parties.nurse_token, &id, "completado").await;
    let response = transition(&service, &parties.nurse_token, &id, "en_progreso").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["details"]["code"], "invalid_state");
    assert_eq!(
        fetch(&service, &parties.user_token, &id).await["estado"],
        "completado"
    );
}

#[actix_web::test]
async fn only_the_assigned_nurse_transitions() {
    let app = InMemoryApp::new();
    let parties = parties(&app).await;
    let (_, other_nurse) = seed_nurse(&app, "otra", "pediatría", 40.0).await;
    let service = actix_test::init_service(test_app(&app)).await;
    let id = create(&service, &parties).await;

    for token in [&other_nurse, &parties.user_token] {
        let response = transition(&service, token, &id, "en_progreso").await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

#[actix_web::test]
async fn unknown_request_is_not_found() {
    let app = InMemoryApp::new();
    let parties = parties(&app).await;
    let service = actix_test::init_service(test_app(&app)).await;

    let missing = uuid::Uuid::new_v4().to_string();
    let response = transition(&service, &parties.nurse_token, &missing, "en_progreso").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn nurse_listing_is_not_found_when_empty() {
    let app = InMemoryApp::new();
    let parties = parties(&app).await;
    let service = actix_test::init_service(test_app(&app)).await;
    let uri = format!("/service-requests/nurse/{}", parties.nurse_id);

    let request = actix_test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&parties.user_token))
        .to_request();
    let response = actix_test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    create(&service, &parties).await;
    let request = actix_test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&parties.user_token))
        .to_request();
    let body = read_json(actix_test::call_service(&service, request).await).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn strangers_cannot_read_a_request() {
    let app = InMemoryApp::new();
    let parties = parties(&app).await;
    let (_, stranger) = seed_user(&app, "luis").await;
    let service = actix_test::init_service(test_app(&app)).await;
    let id = create(&service, &parties).await;

    let request = actix_test::TestRequest::get()
        .uri(&format!("/service-requests/{id}"))
        .insert_header(bearer(&stranger))
        .to_request();
    let response = actix_test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn payment_then_release_after_completion() {
    let app = InMemoryApp::new();
    let parties = parties(&app).await;
    let service = actix_test::init_service(test_app(&app)).await;
    let id = create(&service, &parties).await;
    let pay_uri = format!("/service-requests/{id}/payment");
    let release_uri = format!("/service-requests/{id}/payment/release");

    let request = actix_test::TestRequest::post()
        .uri(&pay_uri)
        .insert_header(bearer(&parties.user_token))
        .to_request();
    let response = actix_test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let transaction = read_json(response).await;
    assert_eq!(transaction["monto"], 50.0);
    assert_eq!(transaction["estado"], "completado");

    let request = actix_test::TestRequest::post()
        .uri(&pay_uri)
        .insert_header(bearer(&parties.user_token))
        .to_request();
    let response = actix_test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let request = actix_test::TestRequest::post()
        .uri(&release_uri)
        .insert_header(bearer(&parties.user_token))
        .to_request();
    let response = actix_test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    transition(&service, &parties.nurse_token, &id, "completado").await;
    let request = actix_test::TestRequest::post()
        .uri(&release_uri)
        .insert_header(bearer(&parties.user_token))
        .to_request();
    let response = actix_test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["pago_liberado"], true);
}

#[rstest]
#[case("user_id")]
#[case("nurse_id")]
#[case("patient_ids")]
#[case("estado")]
#[case("detalles")]
#[case("fecha")]
fn creation_requires_core_fields(#[case] field: &str) {
    let mut payload = json!({
        "user_id": uuid::Uuid::new_v4().to_string(),
        "nurse_id": uuid::Uuid::new_v4().to_string(),
        "patient_ids": [uuid::Uuid::new_v4().to_string()],
        "estado": "pendiente",
        "detalles": "checkup",
        "fecha": "2024-01-01"
    });
    payload.as_object_mut().expect("object").remove(field);
    let body: CreateServiceRequestBody = serde_json::from_value(payload).expect("parses");
    let err = NewServiceRequest::try_from(body).expect_err("missing field");
    assert_eq!(
        err.details().and_then(|d| d.get("field")).and_then(Value::as_str),
        Some(field)
    );
}

#[actix_web::test]
async fn creation_without_patients_is_rejected() {
    let app = InMemoryApp::new();
    let service = actix_test::init_service(test_app(&app)).await;
    let parties = parties(&app).await;
    let mut body = creation(&parties);
    body["patient_ids"] = json!([]);

    let response = actix_test::call_service(
        &service,
        actix_test::TestRequest::post()
            .uri("/service-requests")
            .insert_header(bearer(&parties.user_token))
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["details"]["field"], "patient_ids");
    assert_eq!(payload["details"]["code"], "missing_field");
}
