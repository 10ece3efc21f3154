//! Test helpers for inbound HTTP components.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, web};
use zeroize::Zeroizing;

use crate::domain::{AvailabilitySlot, NewNurse, NewUser, NurseId, UserId};
use crate::inbound::http::configure_api;
use crate::test_support::InMemoryApp;

/// Build an app serving every API handler over `app`'s in-memory state.
pub fn test_app(
    app: &InMemoryApp,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(web::Data::new(app.state.clone()))
        .configure(configure_api)
}

/// `Authorization` header carrying `token`.
pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

/// Register a user directly through the accounts port.
pub async fn seed_user(app: &InMemoryApp, user_name: &str) -> (UserId, String) {
    let registered = app
        .state
        .accounts
        .register_user(NewUser {
            user_name: user_name.to_owned(),
            password: Zeroizing::new("secreto".to_owned()),
            name: format!("Usuario {user_name}"),
            foto: None,
        })
        .await
        .expect("user registers");
    (registered.profile.id, registered.token.token)
}

/// Register a nurse directly through the accounts port.
pub async fn seed_nurse(
    app: &InMemoryApp,
    user_name: &str,
    especialidad: &str,
    tarifa: f64,
) -> (NurseId, String) {
    let registered = app
        .state
        .accounts
        .register_nurse(NewNurse {
            user_name: user_name.to_owned(),
            password: Zeroizing::new("secreto".to_owned()),
            name: format!("Enfermera {user_name}"),
            fecha_nacimiento: "1990-05-15".to_owned(),
            genero: "Femenino".to_owned(),
            descripcion: None,
            especialidad: especialidad.to_owned(),
            ubicacion: "Madrid".to_owned(),
            tarifa,
            disponibilidad: vec![AvailabilitySlot {
                dia: "Lunes".to_owned(),
                hora_inicio: "08:00".to_owned(),
                hora_fin: "17:00".to_owned(),
            }],
            certificados: Vec::new(),
        })
        .await
        .expect("nurse registers");
    (registered.profile.id, registered.token.token)
}
