//! Nurse account and directory HTTP handlers.
//!
//! ```text
//! POST  /nurses/register
//! POST  /nurses/login {"user_name":"marta","password":"secreto"}
//! GET   /nurses/me
//! PATCH /nurses/me
//! GET   /nurses?page=1&limit=10
//! GET   /nurses/search?especialidad=geriatría&ubicacion=Madrid&tarifa=90
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use pagination::PageParams;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{
    AvailabilitySlot, Error, IssuedToken, LoginCredentials, NewNurse, NurseProfile, NurseSearch,
    NurseUpdate, Role,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{ErrorSchema, NursePageSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::LoginRequest;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, missing_field_error, required, required_text,
};

const TARIFA: FieldName = FieldName::new("tarifa");

/// Registration body for `POST /nurses/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterNurseRequest {
    pub name: Option<String>,
    pub user_name: Option<String>,
    pub password: Option<String>,
    /// Date of birth, e.g. `"1990-05-15"`.
    pub fecha_nacimiento: Option<String>,
    pub genero: Option<String>,
    pub descripcion: Option<String>,
    pub especialidad: Option<String>,
    pub ubicacion: Option<String>,
    /// Daily fee.
    pub tarifa: Option<f64>,
    #[serde(default)]
    pub disponibilidad: Vec<AvailabilitySlot>,
    #[serde(default)]
    pub certificados: Vec<String>,
}

fn non_negative_tarifa(tarifa: f64) -> Result<f64, Error> {
    if tarifa.is_finite() && tarifa >= 0.0 {
        Ok(tarifa)
    } else {
        Err(invalid_value_error(
            TARIFA,
            tarifa.to_string(),
            "tarifa must be a non-negative number",
        ))
    }
}

impl TryFrom<RegisterNurseRequest> for NewNurse {
    type Error = Error;

    fn try_from(value: RegisterNurseRequest) -> Result<Self, Self::Error> {
        let password = Zeroizing::new(value.password.unwrap_or_default());
        if password.is_empty() {
            return Err(missing_field_error(FieldName::new("password")));
        }
        Ok(Self {
            user_name: required_text(value.user_name, FieldName::new("user_name"))?
                .trim()
                .to_owned(),
            password,
            name: required_text(value.name, FieldName::new("name"))?,
            fecha_nacimiento: required_text(
                value.fecha_nacimiento,
                FieldName::new("fecha_nacimiento"),
            )?,
            genero: required_text(value.genero, FieldName::new("genero"))?,
            descripcion: value.descripcion,
            especialidad: required_text(value.especialidad, FieldName::new("especialidad"))?,
            ubicacion: required_text(value.ubicacion, FieldName::new("ubicacion"))?,
            tarifa: non_negative_tarifa(required(value.tarifa, TARIFA)?)?,
            disponibilidad: value.disponibilidad,
            certificados: value.certificados,
        })
    }
}

/// Response body for a successful nurse registration.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredNurseResponse {
    pub nurse: NurseProfile,
    /// Bearer token for the new account.
    pub token: String,
}

/// Partial profile update for `PATCH /nurses/me`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateNurseRequest {
    pub name: Option<String>,
    pub fecha_nacimiento: Option<String>,
    pub genero: Option<String>,
    pub descripcion: Option<String>,
    pub especialidad: Option<String>,
    pub ubicacion: Option<String>,
    pub tarifa: Option<f64>,
    pub disponibilidad: Option<Vec<AvailabilitySlot>>,
    pub certificados: Option<Vec<String>>,
}

impl TryFrom<UpdateNurseRequest> for NurseUpdate {
    type Error = Error;

    fn try_from(value: UpdateNurseRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name,
            fecha_nacimiento: value.fecha_nacimiento,
            genero: value.genero,
            descripcion: value.descripcion,
            especialidad: value.especialidad,
            ubicacion: value.ubicacion,
            tarifa: value.tarifa.map(non_negative_tarifa).transpose()?,
            disponibilidad: value.disponibilidad,
            certificados: value.certificados,
        })
    }
}

/// Query string for `GET /nurses/search`.
#[derive(Debug, Default, Deserialize)]
pub struct NurseSearchQuery {
    pub especialidad: Option<String>,
    pub ubicacion: Option<String>,
    /// Maximum daily fee.
    pub tarifa: Option<f64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl NurseSearchQuery {
    fn into_parts(self) -> (NurseSearch, PageParams) {
        let blank_is_none = |value: Option<String>| value.filter(|text| !text.is_empty());
        (
            NurseSearch {
                especialidad: blank_is_none(self.especialidad),
                ubicacion: blank_is_none(self.ubicacion),
                tarifa_max: self.tarifa,
            },
            PageParams::new(self.page, self.limit),
        )
    }
}

/// Register a nurse account and sign it in.
#[utoipa::path(
    post,
    path = "/nurses/register",
    request_body = RegisterNurseRequest,
    responses(
        (status = 201, description = "Nurse registered", body = RegisteredNurseResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "User name already taken", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["nurses"],
    operation_id = "registerNurse",
    security([])
)]
#[post("/nurses/register")]
pub async fn register_nurse(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterNurseRequest>,
) -> ApiResult<HttpResponse> {
    let new_nurse = NewNurse::try_from(payload.into_inner())?;
    let registered = state.accounts.register_nurse(new_nurse).await?;
    Ok(HttpResponse::Created().json(RegisteredNurseResponse {
        nurse: registered.profile,
        token: registered.token.token,
    }))
}

/// Exchange nurse credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/nurses/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = IssuedToken),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["nurses"],
    operation_id = "loginNurse",
    security([])
)]
#[post("/nurses/login")]
pub async fn login_nurse(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<IssuedToken>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let issued = state.login.login(Role::Nurse, &credentials).await?;
    Ok(web::Json(issued))
}

/// The calling nurse's profile.
#[utoipa::path(
    get,
    path = "/nurses/me",
    responses(
        (status = 200, description = "Current nurse", body = NurseProfile),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema)
    ),
    tags = ["nurses"],
    operation_id = "currentNurse",
    security(("BearerAuth" = []))
)]
#[get("/nurses/me")]
pub async fn current_nurse(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<NurseProfile>> {
    let profile = state.accounts_query.nurse_profile(auth.caller()).await?;
    Ok(web::Json(profile))
}

/// Update the calling nurse's public profile.
#[utoipa::path(
    patch,
    path = "/nurses/me",
    request_body = UpdateNurseRequest,
    responses(
        (status = 200, description = "Updated nurse", body = NurseProfile),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema)
    ),
    tags = ["nurses"],
    operation_id = "updateCurrentNurse",
    security(("BearerAuth" = []))
)]
#[patch("/nurses/me")]
pub async fn update_current_nurse(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<UpdateNurseRequest>,
) -> ApiResult<web::Json<NurseProfile>> {
    let update = NurseUpdate::try_from(payload.into_inner())?;
    let profile = state.accounts.update_nurse(auth.caller(), update).await?;
    Ok(web::Json(profile))
}

/// One page of the nurse directory.
#[utoipa::path(
    get,
    path = "/nurses",
    params(
        ("page" = Option<i64>, Query, description = "One-based page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Page size, default 10")
    ),
    responses(
        (status = 200, description = "Nurses", body = NursePageSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["nurses"],
    operation_id = "listNurses",
    security(("BearerAuth" = []))
)]
#[get("/nurses")]
pub async fn list_nurses(
    state: web::Data<HttpState>,
    _auth: Authenticated,
    query: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let page = state
        .accounts_query
        .search_nurses(NurseSearch::default(), query.window())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Filter the nurse directory by speciality, location and maximum fee.
#[utoipa::path(
    get,
    path = "/nurses/search",
    params(
        ("especialidad" = Option<String>, Query, description = "Exact speciality"),
        ("ubicacion" = Option<String>, Query, description = "Exact location"),
        ("tarifa" = Option<f64>, Query, description = "Maximum daily fee, inclusive"),
        ("page" = Option<i64>, Query, description = "One-based page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Page size, default 10")
    ),
    responses(
        (status = 200, description = "Matching nurses", body = NursePageSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["nurses"],
    operation_id = "searchNurses",
    security(("BearerAuth" = []))
)]
#[get("/nurses/search")]
pub async fn search_nurses(
    state: web::Data<HttpState>,
    _auth: Authenticated,
    query: web::Query<NurseSearchQuery>,
) -> ApiResult<HttpResponse> {
    let (search, params) = query.into_inner().into_parts();
    let page = state
        .accounts_query
        .search_nurses(search, params.window())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}
