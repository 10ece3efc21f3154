//! Service request lifecycle HTTP handlers.
//!
//! ```text
//! GET  /service-requests
//! POST /service-requests
//! GET  /service-requests/nurse/{nurse_id}
//! GET  /service-requests/{id}
//! PUT  /service-requests/{id}/estado {"estado":"en_progreso"}
//! POST /service-requests/{id}/payment
//! POST /service-requests/{id}/payment/release
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, Estado, NewServiceRequest, NurseId, PatientId, ServiceRequest, ServiceRequestId,
    Transaction, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, missing_field_error, parse_timestamp_or_date, parse_uuid,
    parse_uuid_list, required_text,
};

const ESTADO: FieldName = FieldName::new("estado");
const TARIFA: FieldName = FieldName::new("tarifa");

/// Request body for `POST /service-requests`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateServiceRequestBody {
    #[schema(format = "uuid")]
    pub user_id: Option<String>,
    #[schema(format = "uuid")]
    pub nurse_id: Option<String>,
    /// At least one patient.
    #[serde(default)]
    #[schema(value_type = Vec<uuid::Uuid>, min_items = 1)]
    pub patient_ids: Vec<String>,
    /// One of `pendiente`, `en_progreso`, `completado`.
    pub estado: Option<String>,
    pub detalles: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    pub fecha: Option<String>,
    pub tarifa: Option<f64>,
    pub pago_realizado: Option<bool>,
    pub pago_liberado: Option<bool>,
}

impl TryFrom<CreateServiceRequestBody> for NewServiceRequest {
    type Error = Error;

    fn try_from(value: CreateServiceRequestBody) -> Result<Self, Self::Error> {
        let user_field = FieldName::new("user_id");
        let nurse_field = FieldName::new("nurse_id");
        let fecha_field = FieldName::new("fecha");

        let user_id = parse_uuid(required_text(value.user_id, user_field)?, user_field)?;
        let nurse_id = parse_uuid(required_text(value.nurse_id, nurse_field)?, nurse_field)?;
        let patients_field = FieldName::new("patient_ids");
        if value.patient_ids.is_empty() {
            return Err(missing_field_error(patients_field));
        }
        let patient_ids = parse_uuid_list(value.patient_ids, patients_field)?;
        let estado = Estado::parse(&required_text(value.estado, ESTADO)?)?;
        let tarifa = value.tarifa.unwrap_or(0.0);
        if !tarifa.is_finite() || tarifa < 0.0 {
            return Err(invalid_value_error(
                TARIFA,
                tarifa.to_string(),
                "tarifa must be a non-negative number",
            ));
        }

        Ok(Self {
            user_id: UserId::from_uuid(user_id),
            nurse_id: NurseId::from_uuid(nurse_id),
            patient_ids: patient_ids.into_iter().map(PatientId::from_uuid).collect(),
            estado,
            detalles: required_text(value.detalles, FieldName::new("detalles"))?,
            fecha: parse_timestamp_or_date(required_text(value.fecha, fecha_field)?, fecha_field)?,
            tarifa,
            pago_realizado: value.pago_realizado.unwrap_or(false),
            pago_liberado: value.pago_liberado.unwrap_or(false),
        })
    }
}

/// Request body for `PUT /service-requests/{id}/estado`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TransitionBody {
    /// Target state.
    pub estado: Option<String>,
}

fn request_id(raw: String) -> Result<ServiceRequestId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(ServiceRequestId::from_uuid)
}

/// Every service request, unscoped.
#[utoipa::path(
    get,
    path = "/service-requests",
    responses(
        (status = 200, description = "All service requests", body = [ServiceRequest]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["service-requests"],
    operation_id = "listServiceRequests",
    security(("BearerAuth" = []))
)]
#[get("/service-requests")]
pub async fn list_service_requests(
    state: web::Data<HttpState>,
    _auth: Authenticated,
) -> ApiResult<web::Json<Vec<ServiceRequest>>> {
    let requests = state.service_requests_query.list_all().await?;
    Ok(web::Json(requests))
}

/// Open a service request.
#[utoipa::path(
    post,
    path = "/service-requests",
    request_body = CreateServiceRequestBody,
    responses(
        (status = 201, description = "Service request created", body = ServiceRequest),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["service-requests"],
    operation_id = "createServiceRequest",
    security(("BearerAuth" = []))
)]
#[post("/service-requests")]
pub async fn create_service_request(
    state: web::Data<HttpState>,
    _auth: Authenticated,
    payload: web::Json<CreateServiceRequestBody>,
) -> ApiResult<HttpResponse> {
    let new_request = NewServiceRequest::try_from(payload.into_inner())?;
    let request = state.service_requests.create(new_request).await?;
    Ok(HttpResponse::Created().json(request))
}

/// Service requests assigned to a nurse; `404` when there are none.
#[utoipa::path(
    get,
    path = "/service-requests/nurse/{nurse_id}",
    params(("nurse_id" = String, Path, description = "Assigned nurse id")),
    responses(
        (status = 200, description = "Assigned service requests", body = [ServiceRequest]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No requests for this nurse", body = ErrorSchema)
    ),
    tags = ["service-requests"],
    operation_id = "listServiceRequestsForNurse",
    security(("BearerAuth" = []))
)]
#[get("/service-requests/nurse/{nurse_id}")]
pub async fn list_for_nurse(
    state: web::Data<HttpState>,
    _auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ServiceRequest>>> {
    let nurse_id = parse_uuid(path.into_inner(), FieldName::new("nurse_id"))?;
    let requests = state
        .service_requests_query
        .list_for_nurse(NurseId::from_uuid(nurse_id))
        .await?;
    Ok(web::Json(requests))
}

/// One service request, visible to its parties.
#[utoipa::path(
    get,
    path = "/service-requests/{id}",
    params(("id" = String, Path, description = "Service request id")),
    responses(
        (status = 200, description = "Service request", body = ServiceRequest),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a party", body = ErrorSchema),
        (status = 404, description = "Unknown service request", body = ErrorSchema)
    ),
    tags = ["service-requests"],
    operation_id = "getServiceRequest",
    security(("BearerAuth" = []))
)]
#[get("/service-requests/{id}")]
pub async fn get_service_request(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<ServiceRequest>> {
    let id = request_id(path.into_inner())?;
    let request = state.service_requests_query.get(auth.caller(), id).await?;
    Ok(web::Json(request))
}

/// Move a service request forward through its lifecycle.
#[utoipa::path(
    put,
    path = "/service-requests/{id}/estado",
    params(("id" = String, Path, description = "Service request id")),
    request_body = TransitionBody,
    responses(
        (status = 200, description = "Updated service request", body = ServiceRequest),
        (status = 400, description = "Unknown or backward state", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the assigned nurse", body = ErrorSchema),
        (status = 404, description = "Unknown service request", body = ErrorSchema)
    ),
    tags = ["service-requests"],
    operation_id = "transitionServiceRequest",
    security(("BearerAuth" = []))
)]
#[put("/service-requests/{id}/estado")]
pub async fn transition_service_request(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<TransitionBody>,
) -> ApiResult<web::Json<ServiceRequest>> {
    let id = request_id(path.into_inner())?;
    let estado = Estado::parse(&required_text(payload.into_inner().estado, ESTADO)?)?;
    let request = state
        .service_requests
        .transition(auth.caller(), id, estado)
        .await?;
    Ok(web::Json(request))
}

/// Pay for a service request as its requesting user.
#[utoipa::path(
    post,
    path = "/service-requests/{id}/payment",
    params(("id" = String, Path, description = "Service request id")),
    responses(
        (status = 201, description = "Payment recorded", body = Transaction),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the requesting user", body = ErrorSchema),
        (status = 404, description = "Unknown service request", body = ErrorSchema),
        (status = 409, description = "Already paid", body = ErrorSchema)
    ),
    tags = ["service-requests"],
    operation_id = "payServiceRequest",
    security(("BearerAuth" = []))
)]
#[post("/service-requests/{id}/payment")]
pub async fn pay_service_request(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = request_id(path.into_inner())?;
    let transaction = state.service_requests.pay(auth.caller(), id).await?;
    Ok(HttpResponse::Created().json(transaction))
}

/// Release a completed, paid request's payment to the nurse.
#[utoipa::path(
    post,
    path = "/service-requests/{id}/payment/release",
    params(("id" = String, Path, description = "Service request id")),
    responses(
        (status = 200, description = "Payment released", body = ServiceRequest),
        (status = 400, description = "Not completed or not paid", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the requesting user", body = ErrorSchema),
        (status = 404, description = "Unknown service request", body = ErrorSchema),
        (status = 409, description = "Already released", body = ErrorSchema)
    ),
    tags = ["service-requests"],
    operation_id = "releaseServiceRequestPayment",
    security(("BearerAuth" = []))
)]
#[post("/service-requests/{id}/payment/release")]
pub async fn release_payment(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<ServiceRequest>> {
    let id = request_id(path.into_inner())?;
    let request = state
        .service_requests
        .release_payment(auth.caller(), id)
        .await?;
    Ok(web::Json(request))
}

#[cfg(test)]
#[path = "service_requests_tests.rs"]
mod tests;
