//! Transaction ledger HTTP handlers for nurses.
//!
//! ```text
//! GET  /transactions?page=1&limit=10
//! POST /transactions/{id}/factura
//! ```

use actix_web::{HttpResponse, get, post, web};
use pagination::PageParams;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Invoice, TransactionId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{ErrorSchema, TransactionPageSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

const INVOICE_MESSAGE: &str = "Factura generada exitosamente";

/// Response body for `POST /transactions/{id}/factura`.
#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceResponse {
    pub message: String,
    pub factura: Invoice,
}

/// Page through the calling nurse's transactions, newest payment first.
#[utoipa::path(
    get,
    path = "/transactions",
    params(
        ("page" = Option<i64>, Query, description = "One-based page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Page size, default 10")
    ),
    responses(
        (status = 200, description = "Transactions", body = TransactionPageSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a nurse", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "listTransactions",
    security(("BearerAuth" = []))
)]
#[get("/transactions")]
pub async fn list_transactions(
    state: web::Data<HttpState>,
    auth: Authenticated,
    query: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let page = state
        .transactions
        .list_for_caller(auth.caller(), query.window())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Render an invoice for one of the calling nurse's transactions.
#[utoipa::path(
    post,
    path = "/transactions/{id}/factura",
    params(("id" = String, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Invoice", body = InvoiceResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a nurse", body = ErrorSchema),
        (status = 404, description = "Unknown transaction", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "issueInvoice",
    security(("BearerAuth" = []))
)]
#[post("/transactions/{id}/factura")]
pub async fn issue_invoice(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<InvoiceResponse>> {
    let id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let factura = state
        .invoices
        .issue_invoice(auth.caller(), TransactionId::from_uuid(id))
        .await?;
    Ok(web::Json(InvoiceResponse {
        message: INVOICE_MESSAGE.to_owned(),
        factura,
    }))
}
