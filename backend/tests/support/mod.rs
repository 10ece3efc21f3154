//! Shared HTTP helpers for integration tests.
//!
//! Each test module includes this with `mod support;` and only uses a
//! subset of the helpers.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test as actix_test;
use actix_web::{App, web};
use serde_json::Value;

use carematch::Trace;
use carematch::inbound::http::configure_api;
use carematch::test_support::InMemoryApp;

/// Build the API over `app`'s in-memory state, wrapped in the trace
/// middleware as in production.
pub fn api(
    app: &InMemoryApp,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(web::Data::new(app.state.clone()))
        .wrap(Trace)
        .configure(configure_api)
}

/// Outcome of one call: status plus decoded JSON body (`Null` when empty).
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

async fn finish(response: ServiceResponse) -> Reply {
    let status = response.status();
    let bytes = actix_test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    Reply { status, body }
}

/// Send `method uri` with an optional bearer token and JSON body.
pub async fn call<S>(
    service: &S,
    method: actix_web::http::Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Reply
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut request = actix_test::TestRequest::default().method(method).uri(uri);
    if let Some(token) = token {
        request = request.insert_header((AUTHORIZATION, format!("Bearer {token}")));
    }
    if let Some(body) = body {
        request = request.set_json(body);
    }
    finish(actix_test::call_service(service, request.to_request()).await).await
}

/// Register through the public endpoint and return `(id, token)`.
pub async fn register<S>(service: &S, role: &str, body: Value) -> (String, String)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let reply = call(
        service,
        actix_web::http::Method::POST,
        &format!("/{role}s/register"),
        None,
        Some(body),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "register {role}: {}", reply.body);
    let id = reply.body[role]["id"].as_str().expect("profile id").to_owned();
    let token = reply.body["token"].as_str().expect("token").to_owned();
    (id, token)
}

/// Registration body for a user.
pub fn user_body(user_name: &str) -> Value {
    serde_json::json!({
        "name": format!("Usuario {user_name}"),
        "user_name": user_name,
        "password": "secreto",
    })
}

/// Registration body for a nurse with the given specialty and fee.
pub fn nurse_body(user_name: &str, especialidad: &str, tarifa: f64) -> Value {
    serde_json::json!({
        "name": format!("Enfermera {user_name}"),
        "user_name": user_name,
        "password": "secreto",
        "fecha_nacimiento": "1988-03-02",
        "genero": "Femenino",
        "especialidad": especialidad,
        "ubicacion": "Madrid",
        "tarifa": tarifa,
        "disponibilidad": [
            {"dia": "Lunes", "horaInicio": "08:00", "horaFin": "14:00"}
        ],
    })
}
