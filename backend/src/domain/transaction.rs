//! Simulated payment transactions and the invoices generated from them.

use chrono::{DateTime, Utc};
use pagination::ItemsKey;
use serde::Serialize;
use utoipa::ToSchema;

use super::{NurseId, ServiceRequest, ServiceRequestId, TransactionId, UserId};

/// Status stored on every simulated payment.
pub const COMPLETED_STATUS: &str = "completado";

/// Static line printed on every invoice.
pub const INVOICE_DETAILS: &str = "Servicio de enfermería proporcionado";

/// A payment from a user to the nurse of a service request.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Transaction {
    pub id: TransactionId,
    pub nurse_id: NurseId,
    pub user_id: UserId,
    pub service_request_id: ServiceRequestId,
    pub monto: f64,
    pub fecha_pago: DateTime<Utc>,
    pub estado: String,
}

impl ItemsKey for Transaction {
    const ITEMS_KEY: &'static str = "transactions";
}

impl Transaction {
    /// Record the payment of `request` for its full fee.
    pub fn for_payment(id: TransactionId, request: &ServiceRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            nurse_id: request.nurse_id,
            user_id: request.user_id,
            service_request_id: request.id,
            monto: request.tarifa,
            fecha_pago: now,
            estado: COMPLETED_STATUS.to_owned(),
        }
    }
}

/// Invoice rendered from a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Invoice {
    pub nurse_id: NurseId,
    pub user_id: UserId,
    pub service_request_id: ServiceRequestId,
    pub monto: f64,
    pub fecha_pago: DateTime<Utc>,
    pub estado: String,
    pub fecha_factura: DateTime<Utc>,
    pub detalles: String,
}

impl Invoice {
    /// Render the invoice for `transaction` issued at `issued_at`.
    pub fn issue(transaction: Transaction, issued_at: DateTime<Utc>) -> Self {
        Self {
            nurse_id: transaction.nurse_id,
            user_id: transaction.user_id,
            service_request_id: transaction.service_request_id,
            monto: transaction.monto,
            fecha_pago: transaction.fecha_pago,
            estado: transaction.estado,
            fecha_factura: issued_at,
            detalles: INVOICE_DETAILS.to_owned(),
        }
    }
}
