//! End-to-end scenarios for service requests and the resources that hang
//! off them, driven over HTTP against in-memory adapters.

mod support;

use actix_web::http::{Method, StatusCode};
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::json;

use carematch::test_support::InMemoryApp;
use support::{api, call, nurse_body, register, user_body};

#[actix_web::test]
async fn booking_is_completed_and_reviewed_by_its_user_only() {
    let app = InMemoryApp::new();
    let service = actix_test::init_service(api(&app)).await;
    let (u1, u1_token) = register(&service, "user", user_body("u1")).await;
    let (_, u2_token) = register(&service, "user", user_body("u2")).await;
    let (n1, n1_token) = register(&service, "nurse", nurse_body("n1", "geriatría", 50.0)).await;

    let created = call(
        &service,
        Method::POST,
        "/service-requests",
        Some(&u1_token),
        Some(json!({
            "user_id": u1,
            "nurse_id": n1,
            "patient_ids": [uuid::Uuid::new_v4().to_string()],
            "estado": "pendiente",
            "detalles": "checkup",
            "fecha": "2024-01-01",
            "tarifa": 50,
        })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let request_id = created.body["id"].as_str().expect("id").to_owned();

    for estado in ["en_progreso", "completado"] {
        let moved = call(
            &service,
            Method::PUT,
            &format!("/service-requests/{request_id}/estado"),
            Some(&n1_token),
            Some(json!({ "estado": estado })),
        )
        .await;
        assert_eq!(moved.status, StatusCode::OK);
        assert_eq!(moved.body["estado"], estado);
    }

    let review = json!({
        "nurse_id": n1,
        "service_request_id": request_id,
        "calificacion": 5,
        "comentario": "Excelente",
    });
    let by_user = call(&service, Method::POST, "/reviews", Some(&u1_token), Some(review.clone())).await;
    assert_eq!(by_user.status, StatusCode::CREATED);
    assert_eq!(by_user.body["user_id"], u1.as_str());

    let by_stranger = call(&service, Method::POST, "/reviews", Some(&u2_token), Some(review)).await;
    assert_eq!(by_stranger.status, StatusCode::FORBIDDEN);

    let listed = call(
        &service,
        Method::GET,
        &format!("/reviews/{n1}"),
        Some(&n1_token),
        None,
    )
    .await;
    assert_eq!(listed.body["total"], 1);
}

#[rstest]
#[case("pendiente")]
#[case("en_progreso")]
#[actix_web::test]
async fn unfinished_bookings_cannot_be_reviewed(#[case] estado: &str) {
    let app = InMemoryApp::new();
    let service = actix_test::init_service(api(&app)).await;
    let (u1, u1_token) = register(&service, "user", user_body("u1")).await;
    let (n1, _) = register(&service, "nurse", nurse_body("n1", "geriatría", 50.0)).await;

    let created = call(
        &service,
        Method::POST,
        "/service-requests",
        Some(&u1_token),
        Some(json!({
            "user_id": u1,
            "nurse_id": n1,
            "estado": estado,
            "detalles": "checkup",
            "fecha": "2024-01-01T08:00:00Z",
        })),
    )
    .await;
    let request_id = created.body["id"].as_str().expect("id").to_owned();

    let review = call(
        &service,
        Method::POST,
        "/reviews",
        Some(&u1_token),
        Some(json!({
            "nurse_id": n1,
            "service_request_id": request_id,
            "calificacion": 3,
        })),
    )
    .await;
    assert_eq!(review.status, StatusCode::FORBIDDEN);
    assert_eq!(review.body["details"]["code"], "cannot_review");
}

#[actix_web::test]
async fn only_parties_chat_and_history_is_chronological() {
    let app = InMemoryApp::new();
    let service = actix_test::init_service(api(&app)).await;
    let (u1, u1_token) = register(&service, "user", user_body("u1")).await;
    let (_, u2_token) = register(&service, "user", user_body("u2")).await;
    let (n1, n1_token) = register(&service, "nurse", nurse_body("n1", "pediatría", 45.0)).await;

    let created = call(
        &service,
        Method::POST,
        "/service-requests",
        Some(&u1_token),
        Some(json!({
            "user_id": u1,
            "nurse_id": n1,
            "estado": "pendiente",
            "detalles": "curas",
            "fecha": "2024-02-10",
            "tarifa": 45,
        })),
    )
    .await;
    let request_id = created.body["id"].as_str().expect("id").to_owned();

    let intruder = call(
        &service,
        Method::POST,
        "/messages",
        Some(&u2_token),
        Some(json!({
            "service_request_id": request_id,
            "receiver_id": n1,
            "content": "¿Puedo unirme?",
        })),
    )
    .await;
    assert_eq!(intruder.status, StatusCode::FORBIDDEN);

    let turns = [
        (&u1_token, &n1, "Buenos días"),
        (&n1_token, &u1, "Buenos días, llego a las diez"),
        (&u1_token, &n1, "Perfecto"),
    ];
    for (token, receiver, content) in turns {
        let sent = call(
            &service,
            Method::POST,
            "/messages",
            Some(token),
            Some(json!({
                "service_request_id": request_id,
                "receiver_id": receiver,
                "content": content,
            })),
        )
        .await;
        assert_eq!(sent.status, StatusCode::CREATED);
        app.clock.advance_seconds(60);
    }

    let history = call(
        &service,
        Method::GET,
        &format!("/messages/{request_id}?page=1&limit=2"),
        Some(&n1_token),
        None,
    )
    .await;
    assert_eq!(history.status, StatusCode::OK);
    assert_eq!(history.body["total"], 3);
    let contents: Vec<&str> = history.body["messages"]
        .as_array()
        .expect("messages")
        .iter()
        .filter_map(|m| m["content"].as_str())
        .collect();
    assert_eq!(contents, ["Buenos días", "Buenos días, llego a las diez"]);
}

#[actix_web::test]
async fn payment_reaches_the_nurse_ledger_and_invoice() {
    let app = InMemoryApp::new();
    let service = actix_test::init_service(api(&app)).await;
    let (u1, u1_token) = register(&service, "user", user_body("u1")).await;
    let (n1, n1_token) = register(&service, "nurse", nurse_body("n1", "geriatría", 60.0)).await;

    let created = call(
        &service,
        Method::POST,
        "/service-requests",
        Some(&u1_token),
        Some(json!({
            "user_id": u1,
            "nurse_id": n1,
            "estado": "pendiente",
            "detalles": "noche",
            "fecha": "2024-03-01",
            "tarifa": 60,
        })),
    )
    .await;
    let request_id = created.body["id"].as_str().expect("id").to_owned();

    let paid = call(
        &service,
        Method::POST,
        &format!("/service-requests/{request_id}/payment"),
        Some(&u1_token),
        None,
    )
    .await;
    assert_eq!(paid.status, StatusCode::CREATED);
    let transaction_id = paid.body["id"].as_str().expect("transaction id").to_owned();

    let ledger = call(&service, Method::GET, "/transactions", Some(&n1_token), None).await;
    assert_eq!(ledger.body["total"], 1);
    assert_eq!(ledger.body["transactions"][0]["monto"], 60.0);

    let invoice = call(
        &service,
        Method::POST,
        &format!("/transactions/{transaction_id}/factura"),
        Some(&n1_token),
        None,
    )
    .await;
    assert_eq!(invoice.status, StatusCode::OK);
    assert_eq!(invoice.body["factura"]["service_request_id"], request_id.as_str());
    assert_eq!(invoice.body["factura"]["user_id"], u1.as_str());
}

#[actix_web::test]
async fn errors_echo_the_response_trace_id() {
    let app = InMemoryApp::new();
    let service = actix_test::init_service(api(&app)).await;

    let request = actix_test::TestRequest::get().uri("/users/me").to_request();
    let response = actix_test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let header = response
        .headers()
        .get("trace-id")
        .expect("trace id header")
        .to_str()
        .expect("ascii")
        .to_owned();
    let body: serde_json::Value = actix_test::read_body_json(response).await;
    assert_eq!(body["traceId"], header.as_str());
}
