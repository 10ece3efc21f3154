//! Review HTTP handlers.
//!
//! ```text
//! POST /reviews {"nurse_id":"…","service_request_id":"…","calificacion":5}
//! GET  /reviews/{nurse_id}?page=1&limit=10
//! ```

use actix_web::{HttpResponse, get, post, web};
use pagination::PageParams;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, NewReview, NurseId, Rating, Review, ServiceRequestId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{ErrorSchema, ReviewPageSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_uuid, required, required_text,
};

const CALIFICACION: FieldName = FieldName::new("calificacion");

/// Request body for `POST /reviews`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateReviewRequest {
    #[schema(format = "uuid")]
    pub nurse_id: Option<String>,
    #[schema(format = "uuid")]
    pub service_request_id: Option<String>,
    /// Rating between 1 and 5.
    pub calificacion: Option<i64>,
    pub comentario: Option<String>,
}

impl TryFrom<CreateReviewRequest> for NewReview {
    type Error = Error;

    fn try_from(value: CreateReviewRequest) -> Result<Self, Self::Error> {
        let nurse_field = FieldName::new("nurse_id");
        let request_field = FieldName::new("service_request_id");
        let raw_rating = required(value.calificacion, CALIFICACION)?;
        let calificacion = Rating::new(raw_rating).map_err(|err| {
            invalid_value_error(CALIFICACION, raw_rating.to_string(), err.to_string())
        })?;
        Ok(Self {
            nurse_id: NurseId::from_uuid(parse_uuid(
                required_text(value.nurse_id, nurse_field)?,
                nurse_field,
            )?),
            service_request_id: ServiceRequestId::from_uuid(parse_uuid(
                required_text(value.service_request_id, request_field)?,
                request_field,
            )?),
            calificacion,
            comentario: value.comentario,
        })
    }
}

/// Review the nurse of a completed service request.
#[utoipa::path(
    post,
    path = "/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review stored", body = Review),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Request not reviewable by caller", body = ErrorSchema),
        (status = 409, description = "Already reviewed", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "createReview",
    security(("BearerAuth" = []))
)]
#[post("/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<CreateReviewRequest>,
) -> ApiResult<HttpResponse> {
    let new_review = NewReview::try_from(payload.into_inner())?;
    let review = state.reviews.create(auth.caller(), new_review).await?;
    Ok(HttpResponse::Created().json(review))
}

/// Page through the calling nurse's reviews, newest first.
#[utoipa::path(
    get,
    path = "/reviews/{nurse_id}",
    params(
        ("nurse_id" = String, Path, description = "Reviewed nurse id"),
        ("page" = Option<i64>, Query, description = "One-based page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Page size, default 10")
    ),
    responses(
        (status = 200, description = "Reviews", body = ReviewPageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not this nurse", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "listReviews",
    security(("BearerAuth" = []))
)]
#[get("/reviews/{nurse_id}")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    query: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let nurse_id = parse_uuid(path.into_inner(), FieldName::new("nurse_id"))?;
    let page = state
        .reviews_query
        .list_for_nurse(auth.caller(), NurseId::from_uuid(nurse_id), query.window())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}
