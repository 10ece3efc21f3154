//! Support desk HTTP handlers.
//!
//! ```text
//! GET  /support/faq?page=1&limit=10
//! POST /support/request {"asunto":"Pago","mensaje":"No veo mi factura"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use pagination::PageParams;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, NewSupportRequest, SupportRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{ErrorSchema, FaqPageSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, required_text};

/// Request body for `POST /support/request`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct OpenSupportRequest {
    pub asunto: Option<String>,
    pub mensaje: Option<String>,
}

impl TryFrom<OpenSupportRequest> for NewSupportRequest {
    type Error = Error;

    fn try_from(value: OpenSupportRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            asunto: required_text(value.asunto, FieldName::new("asunto"))?,
            mensaje: required_text(value.mensaje, FieldName::new("mensaje"))?,
        })
    }
}

/// Frequently asked questions. No token required.
#[utoipa::path(
    get,
    path = "/support/faq",
    params(
        ("page" = Option<i64>, Query, description = "One-based page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Page size, default 10")
    ),
    responses(
        (status = 200, description = "FAQ entries", body = FaqPageSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["support"],
    operation_id = "listFaqs",
    security([])
)]
#[get("/support/faq")]
pub async fn list_faqs(
    state: web::Data<HttpState>,
    query: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let page = state.faqs.list_faqs(query.window()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Open a support ticket as the calling user or nurse.
#[utoipa::path(
    post,
    path = "/support/request",
    request_body = OpenSupportRequest,
    responses(
        (status = 201, description = "Ticket opened", body = SupportRequest),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["support"],
    operation_id = "openSupportRequest",
    security(("BearerAuth" = []))
)]
#[post("/support/request")]
pub async fn open_support_request(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<OpenSupportRequest>,
) -> ApiResult<HttpResponse> {
    let ticket = NewSupportRequest::try_from(payload.into_inner())?;
    let opened = state.support.open(auth.caller(), ticket).await?;
    Ok(HttpResponse::Created().json(opened))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Faq, FaqId};
    use crate::inbound::http::test_utils::{bearer, seed_nurse, test_app};
    use crate::test_support::InMemoryApp;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{Value, json};

    fn faqs(count: usize) -> Vec<Faq> {
        (0..count)
            .map(|index| Faq {
                id: FaqId::random(),
                pregunta: format!("Pregunta {index}"),
                respuesta: format!("Respuesta {index}"),
            })
            .collect()
    }

    async fn read_json(response: actix_web::dev::ServiceResponse) -> Value {
        let body = actix_test::read_body(response).await;
        serde_json::from_slice(&body).expect("JSON body")
    }

    #[actix_web::test]
    async fn faq_is_public_and_paged() {
        let app = InMemoryApp::with_faqs(faqs(3));
        let service = actix_test::init_service(test_app(&app)).await;

        let request = actix_test::TestRequest::get()
            .uri("/support/faq?page=2&limit=2")
            .to_request();
        let response = actix_test::call_service(&service, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["total"], 3);
        assert_eq!(body["faqs"][0]["pregunta"], "Pregunta 2");
    }

    #[actix_web::test]
    async fn ticket_records_the_caller_role() {
        let app = InMemoryApp::new();
        let (nurse, token) = seed_nurse(&app, "marta", "geriatría", 50.0).await;
        let service = actix_test::init_service(test_app(&app)).await;

        let request = actix_test::TestRequest::post()
            .uri("/support/request")
            .insert_header(bearer(&token))
            .set_json(json!({"asunto": "Pago", "mensaje": "No veo mi factura"}))
            .to_request();
        let response = actix_test::call_service(&service, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        assert_eq!(body["tipo_usuario"], "nurse");
        assert_eq!(body["estado"], "pendiente");
        assert_eq!(body["user_id"], nurse.to_string());
        assert_eq!(app.support.requests().len(), 1);
    }

    #[actix_web::test]
    async fn ticket_requires_subject_and_body() {
        let app = InMemoryApp::new();
        let (_, token) = seed_nurse(&app, "marta", "geriatría", 50.0).await;
        let service = actix_test::init_service(test_app(&app)).await;

        let request = actix_test::TestRequest::post()
            .uri("/support/request")
            .insert_header(bearer(&token))
            .set_json(json!({"asunto": "Pago"}))
            .to_request();
        let response = actix_test::call_service(&service, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["details"]["field"], "mensaje");
    }
}
