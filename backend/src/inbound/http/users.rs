//! User account HTTP handlers.
//!
//! ```text
//! POST  /users/register {"name":"Ana","user_name":"ana","password":"secreto"}
//! POST  /users/login    {"user_name":"ana","password":"secreto"}
//! GET   /users/me
//! PATCH /users/me       {"foto":"https://example.test/ana.png"}
//! GET   /users?page=1&limit=10
//! GET   /users/panel
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use pagination::PageParams;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{Error, IssuedToken, LoginCredentials, NewUser, Role, UserProfile, UserUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{ErrorSchema, UserPageSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, required_text};

/// Login request body shared by `POST /users/login` and `POST /nurses/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub user_name: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        let user_name = value.user_name.unwrap_or_default();
        let password = Zeroizing::new(value.password.unwrap_or_default());
        Ok(Self::try_from_parts(&user_name, &password)?)
    }
}

/// Registration body for `POST /users/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterUserRequest {
    pub name: Option<String>,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub foto: Option<String>,
}

impl TryFrom<RegisterUserRequest> for NewUser {
    type Error = Error;

    fn try_from(value: RegisterUserRequest) -> Result<Self, Self::Error> {
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
            foto: value.foto,
        })
    }
}

/// Response body for a successful user registration.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredUserResponse {
    pub user: UserProfile,
    /// Bearer token for the new account.
    pub token: String,
}

/// Partial profile update for `PATCH /users/me`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub foto: Option<String>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(value: UpdateUserRequest) -> Self {
        Self {
            name: value.name,
            foto: value.foto,
        }
    }
}

/// Static landing panel for signed-in users.
#[derive(Debug, Serialize, ToSchema)]
pub struct PanelResponse {
    pub message: String,
    pub opciones: Vec<String>,
}

const PANEL_MESSAGE: &str = "Bienvenido al panel principal";
const PANEL_OPTIONS: [&str; 2] = ["Buscar Enfermeros", "Mis Pacientes"];

/// Register a user account and sign it in.
#[utoipa::path(
    post,
    path = "/users/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = RegisteredUserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "User name already taken", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users/register")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterUserRequest>,
) -> ApiResult<HttpResponse> {
    let new_user = NewUser::try_from(payload.into_inner())?;
    let registered = state.accounts.register_user(new_user).await?;
    Ok(HttpResponse::Created().json(RegisteredUserResponse {
        user: registered.profile,
        token: registered.token.token,
    }))
}

/// Exchange user credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = IssuedToken),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "loginUser",
    security([])
)]
#[post("/users/login")]
pub async fn login_user(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<IssuedToken>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let issued = state.login.login(Role::User, &credentials).await?;
    Ok(web::Json(issued))
}

/// The calling user's profile.
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("BearerAuth" = []))
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<UserProfile>> {
    let profile = state.accounts_query.user_profile(auth.caller()).await?;
    Ok(web::Json(profile))
}

/// Update the calling user's name or photo.
#[utoipa::path(
    patch,
    path = "/users/me",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserProfile),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser",
    security(("BearerAuth" = []))
)]
#[patch("/users/me")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let profile = state
        .accounts
        .update_user(auth.caller(), payload.into_inner().into())
        .await?;
    Ok(web::Json(profile))
}

/// One page of the user directory.
#[utoipa::path(
    get,
    path = "/users",
    params(
        ("page" = Option<i64>, Query, description = "One-based page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Page size, default 10")
    ),
    responses(
        (status = 200, description = "Users", body = UserPageSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security(("BearerAuth" = []))
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    _auth: Authenticated,
    query: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let page = state.accounts_query.list_users(query.window()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Landing panel shown after sign-in.
#[utoipa::path(
    get,
    path = "/users/panel",
    responses(
        (status = 200, description = "Panel", body = PanelResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "userPanel",
    security(("BearerAuth" = []))
)]
#[get("/users/panel")]
pub async fn panel(_auth: Authenticated) -> web::Json<PanelResponse> {
    web::Json(PanelResponse {
        message: PANEL_MESSAGE.to_owned(),
        opciones: PANEL_OPTIONS.iter().map(|option| (*option).to_owned()).collect(),
    })
}
