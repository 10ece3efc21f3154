//! Patient HTTP handlers.
//!
//! ```text
//! POST   /patients
//! GET    /patients?user_id=<uuid>&page=1&limit=10
//! PUT    /patients/{id}
//! DELETE /patients/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::PageParams;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, NewPatient, Patient, PatientId, PatientUpdate, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{ErrorSchema, PatientPageSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, required_text};

const USER_ID: FieldName = FieldName::new("user_id");

/// Request body for `POST /patients`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreatePatientRequest {
    /// Owning user.
    #[schema(format = "uuid")]
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub fecha_nacimiento: Option<String>,
    pub genero: Option<String>,
    pub movilidad: Option<String>,
    pub descripcion: Option<String>,
}

impl TryFrom<CreatePatientRequest> for NewPatient {
    type Error = Error;

    fn try_from(value: CreatePatientRequest) -> Result<Self, Self::Error> {
        let owner = parse_uuid(required_text(value.user_id, USER_ID)?, USER_ID)?;
        Ok(Self {
            usuario_id: UserId::from_uuid(owner),
            name: required_text(value.name, FieldName::new("name"))?,
            fecha_nacimiento: required_text(
                value.fecha_nacimiento,
                FieldName::new("fecha_nacimiento"),
            )?,
            genero: required_text(value.genero, FieldName::new("genero"))?,
            movilidad: required_text(value.movilidad, FieldName::new("movilidad"))?,
            descripcion: required_text(value.descripcion, FieldName::new("descripcion"))?,
        })
    }
}

/// Request body for `PUT /patients/{id}`; absent fields are kept.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub fecha_nacimiento: Option<String>,
    pub genero: Option<String>,
    pub movilidad: Option<String>,
    pub descripcion: Option<String>,
}

impl From<UpdatePatientRequest> for PatientUpdate {
    fn from(value: UpdatePatientRequest) -> Self {
        Self {
            name: value.name,
            fecha_nacimiento: value.fecha_nacimiento,
            genero: value.genero,
            movilidad: value.movilidad,
            descripcion: value.descripcion,
        }
    }
}

/// Query string for `GET /patients`.
#[derive(Debug, Default, Deserialize)]
pub struct ListPatientsQuery {
    pub user_id: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn patient_id(raw: String) -> Result<PatientId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(PatientId::from_uuid)
}

/// Register a patient for a user.
#[utoipa::path(
    post,
    path = "/patients",
    request_body = CreatePatientRequest,
    responses(
        (status = 201, description = "Patient created", body = Patient),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["patients"],
    operation_id = "createPatient",
    security(("BearerAuth" = []))
)]
#[post("/patients")]
pub async fn create_patient(
    state: web::Data<HttpState>,
    _auth: Authenticated,
    payload: web::Json<CreatePatientRequest>,
) -> ApiResult<HttpResponse> {
    let new_patient = NewPatient::try_from(payload.into_inner())?;
    let patient = state.patients.create(new_patient).await?;
    Ok(HttpResponse::Created().json(patient))
}

/// One page of a user's patients.
#[utoipa::path(
    get,
    path = "/patients",
    params(
        ("user_id" = String, Query, description = "Owning user id"),
        ("page" = Option<i64>, Query, description = "One-based page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Page size, default 10")
    ),
    responses(
        (status = 200, description = "Patients", body = PatientPageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["patients"],
    operation_id = "listPatients",
    security(("BearerAuth" = []))
)]
#[get("/patients")]
pub async fn list_patients(
    state: web::Data<HttpState>,
    _auth: Authenticated,
    query: web::Query<ListPatientsQuery>,
) -> ApiResult<HttpResponse> {
    let ListPatientsQuery {
        user_id,
        page,
        limit,
    } = query.into_inner();
    let owner = parse_uuid(required_text(user_id, USER_ID)?, USER_ID)?;
    let page = state
        .patients_query
        .list_for_owner(
            UserId::from_uuid(owner),
            PageParams::new(page, limit).window(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Update one of the caller's patients.
#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient id")),
    request_body = UpdatePatientRequest,
    responses(
        (status = 200, description = "Updated patient", body = Patient),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Unknown patient", body = ErrorSchema)
    ),
    tags = ["patients"],
    operation_id = "updatePatient",
    security(("BearerAuth" = []))
)]
#[put("/patients/{id}")]
pub async fn update_patient(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<UpdatePatientRequest>,
) -> ApiResult<web::Json<Patient>> {
    let id = patient_id(path.into_inner())?;
    let patient = state
        .patients
        .update(auth.caller(), id, payload.into_inner().into())
        .await?;
    Ok(web::Json(patient))
}

/// Delete one of the caller's patients.
#[utoipa::path(
    delete,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 204, description = "Patient deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Unknown patient", body = ErrorSchema)
    ),
    tags = ["patients"],
    operation_id = "deletePatient",
    security(("BearerAuth" = []))
)]
#[delete("/patients/{id}")]
pub async fn delete_patient(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = patient_id(path.into_inner())?;
    state.patients.delete(auth.caller(), id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{bearer, seed_user, test_app};
    use crate::test_support::InMemoryApp;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{Value, json};

    fn new_patient(owner: UserId) -> Value {
        json!({
            "user_id": owner.to_string(),
            "name": "Carmen",
            "fecha_nacimiento": "1940-02-03",
            "genero": "Femenino",
            "movilidad": "silla de ruedas",
            "descripcion": "Diabetes tipo 2"
        })
    }

    async fn read_json(response: actix_web::dev::ServiceResponse) -> Value {
        let body = actix_test::read_body(response).await;
        serde_json::from_slice(&body).expect("JSON body")
    }

    #[actix_web::test]
    async fn created_patients_are_listed_for_their_owner() {
        let app = InMemoryApp::new();
        let (owner, token) = seed_user(&app, "ana").await;
        let (other, _) = seed_user(&app, "luis").await;
        let service = actix_test::init_service(test_app(&app)).await;

        for owner in [owner, owner, other] {
            let request = actix_test::TestRequest::post()
                .uri("/patients")
                .insert_header(bearer(&token))
                .set_json(new_patient(owner))
                .to_request();
            let response = actix_test::call_service(&service, request).await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let request = actix_test::TestRequest::get()
            .uri(&format!("/patients?user_id={owner}"))
            .insert_header(bearer(&token))
            .to_request();
        let body = read_json(actix_test::call_service(&service, request).await).await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["patients"][0]["usuario_id"], owner.to_string());
    }

    #[actix_web::test]
    async fn listing_without_owner_is_rejected() {
        let app = InMemoryApp::new();
        let (_, token) = seed_user(&app, "ana").await;
        let service = actix_test::init_service(test_app(&app)).await;

        let request = actix_test::TestRequest::get()
            .uri("/patients")
            .insert_header(bearer(&token))
            .to_request();
        let response = actix_test::call_service(&service, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["details"]["field"], "user_id");
    }

    #[actix_web::test]
    async fn only_the_owner_may_modify_a_patient() {
        let app = InMemoryApp::new();
        let (owner, owner_token) = seed_user(&app, "ana").await;
        let (_, stranger_token) = seed_user(&app, "luis").await;
        let service = actix_test::init_service(test_app(&app)).await;

        let request = actix_test::TestRequest::post()
            .uri("/patients")
            .insert_header(bearer(&owner_token))
            .set_json(new_patient(owner))
            .to_request();
        let created = read_json(actix_test::call_service(&service, request).await).await;
        let uri = format!("/patients/{}", created["id"].as_str().expect("id"));

        let request = actix_test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&stranger_token))
            .set_json(json!({"movilidad": "autónoma"}))
            .to_request();
        let response = actix_test::call_service(&service, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let request = actix_test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&owner_token))
            .set_json(json!({"movilidad": "autónoma"}))
            .to_request();
        let body = read_json(actix_test::call_service(&service, request).await).await;
        assert_eq!(body["movilidad"], "autónoma");
        assert_eq!(body["name"], "Carmen");

        let request = actix_test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&owner_token))
            .to_request();
        let response = actix_test::call_service(&service, request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let request = actix_test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&owner_token))
            .to_request();
        let response = actix_test::call_service(&service, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn malformed_owner_id_is_reported() {
        let body: CreatePatientRequest = serde_json::from_value(json!({
            "user_id": "u1",
            "name": "Carmen",
            "fecha_nacimiento": "1940-02-03",
            "genero": "Femenino",
            "movilidad": "autónoma",
            "descripcion": "-"
        }))
        .expect("parses");
        let err = NewPatient::try_from(body).expect_err("bad uuid");
        assert_eq!(
            err.details().and_then(|d| d.get("code")).and_then(Value::as_str),
            Some("invalid_uuid")
        );
    }
}
