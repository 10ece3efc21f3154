//! End-to-end scenarios for accounts, nurse search and patients.

mod support;

use actix_web::http::{Method, StatusCode};
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::json;

use carematch::domain::Role;
use carematch::test_support::InMemoryApp;
use support::{api, call, nurse_body, register, user_body};

#[rstest]
#[case("user", Role::User)]
#[case("nurse", Role::Nurse)]
#[actix_web::test]
async fn login_token_verifies_to_the_registered_identity(#[case] role: &str, #[case] expected: Role) {
    let app = InMemoryApp::new();
    let service = actix_test::init_service(api(&app)).await;
    let body = if role == "user" {
        user_body("carmen")
    } else {
        nurse_body("carmen", "geriatría", 35.0)
    };
    let (id, _) = register(&service, role, body).await;

    let login = call(
        &service,
        Method::POST,
        &format!("/{role}s/login"),
        None,
        Some(json!({"user_name": "carmen", "password": "secreto"})),
    )
    .await;
    assert_eq!(login.status, StatusCode::OK);
    let token = login.body["token"].as_str().expect("token");
    let caller = app.state.tokens.verify(token).expect("token verifies");
    assert_eq!(caller.id().to_string(), id);
    assert_eq!(caller.role(), expected);
}

#[actix_web::test]
async fn expired_tokens_are_rejected() {
    let app = InMemoryApp::new();
    let service = actix_test::init_service(api(&app)).await;
    let (_, token) = register(&service, "user", user_body("carmen")).await;

    app.clock.advance_seconds(carematch::test_support::TEST_TOKEN_TTL_SECS + 1);
    let me = call(&service, Method::GET, "/users/me", Some(&token), None).await;
    assert_eq!(me.status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn search_filters_by_maximum_fee() {
    let app = InMemoryApp::new();
    let service = actix_test::init_service(api(&app)).await;
    let (_, token) = register(&service, "user", user_body("carmen")).await;
    let (expensive, _) = register(&service, "nurse", nurse_body("cara", "geriatría", 50.0)).await;
    let (cheap, _) = register(&service, "nurse", nurse_body("barata", "geriatría", 30.0)).await;

    let found = call(
        &service,
        Method::GET,
        "/nurses/search?tarifa=40",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(found.status, StatusCode::OK);
    let ids: Vec<&str> = found.body["nurses"]
        .as_array()
        .expect("nurses")
        .iter()
        .filter_map(|n| n["id"].as_str())
        .collect();
    assert!(ids.contains(&cheap.as_str()));
    assert!(!ids.contains(&expensive.as_str()));
    assert!(found.body["nurses"][0].get("password").is_none());
}

#[actix_web::test]
async fn patients_are_managed_by_their_owner() {
    let app = InMemoryApp::new();
    let service = actix_test::init_service(api(&app)).await;
    let (owner, owner_token) = register(&service, "user", user_body("carmen")).await;
    let (_, other_token) = register(&service, "user", user_body("pedro")).await;

    let created = call(
        &service,
        Method::POST,
        "/patients",
        Some(&owner_token),
        Some(json!({
            "user_id": owner,
            "name": "Abuela Rosa",
            "fecha_nacimiento": "1940-07-12",
            "genero": "Femenino",
            "movilidad": "Silla de ruedas",
            "descripcion": "Diabetes tipo 2",
        })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let patient_id = created.body["id"].as_str().expect("id").to_owned();
    let uri = format!("/patients/{patient_id}");

    let hijack = call(&service, Method::DELETE, &uri, Some(&other_token), None).await;
    assert_eq!(hijack.status, StatusCode::FORBIDDEN);

    let updated = call(
        &service,
        Method::PUT,
        &uri,
        Some(&owner_token),
        Some(json!({"movilidad": "Andador"})),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["movilidad"], "Andador");
    assert_eq!(updated.body["name"], "Abuela Rosa");

    let deleted = call(&service, Method::DELETE, &uri, Some(&owner_token), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let listed = call(
        &service,
        Method::GET,
        &format!("/patients?user_id={owner}"),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(listed.body["total"], 0);
}
