//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    faqs, messages, nurses, patients, reviews, service_requests, support_requests, transactions,
    users,
};

// ---------------------------------------------------------------------------
// Identity models
// ---------------------------------------------------------------------------

/// Row struct for reading and inserting users.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub user_name: String,
    pub password_hash: String,
    pub name: String,
    pub foto: Option<String>,
    pub verificado: String,
}

/// Changeset for the mutable user profile fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserProfileChangeset<'a> {
    pub name: &'a str,
    pub foto: Option<&'a str>,
}

/// Row struct for reading and inserting nurses.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = nurses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NurseRow {
    pub id: Uuid,
    pub user_name: String,
    pub password_hash: String,
    pub name: String,
    pub fecha_nacimiento: String,
    pub genero: String,
    pub descripcion: Option<String>,
    pub especialidad: String,
    pub ubicacion: String,
    pub tarifa: f64,
    pub disponibilidad: serde_json::Value,
    pub certificados: Vec<String>,
}

/// Changeset for the mutable nurse profile fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = nurses)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct NurseProfileChangeset<'a> {
    pub name: &'a str,
    pub fecha_nacimiento: &'a str,
    pub genero: &'a str,
    pub descripcion: Option<&'a str>,
    pub especialidad: &'a str,
    pub ubicacion: &'a str,
    pub tarifa: f64,
    pub disponibilidad: serde_json::Value,
    pub certificados: &'a [String],
}

// ---------------------------------------------------------------------------
// Patient models
// ---------------------------------------------------------------------------

/// Row struct for patients; also used as the full-row changeset.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = patients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PatientRow {
    pub id: Uuid,
    pub usuario_id: Uuid,
    pub name: String,
    pub fecha_nacimiento: String,
    pub genero: String,
    pub movilidad: String,
    pub descripcion: String,
}

// ---------------------------------------------------------------------------
// Service request models
// ---------------------------------------------------------------------------

/// Row struct for service requests.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = service_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ServiceRequestRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub nurse_id: Uuid,
    pub patient_ids: Vec<Uuid>,
    pub estado: String,
    pub detalles: String,
    pub fecha: DateTime<Utc>,
    pub tarifa: f64,
    pub pago_realizado: bool,
    pub pago_liberado: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset written by lifecycle and payment updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = service_requests)]
pub(crate) struct ServiceRequestChangeset<'a> {
    pub estado: &'a str,
    pub pago_realizado: bool,
    pub pago_liberado: bool,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Dependent resources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MessageRow {
    pub id: Uuid,
    pub service_request_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub nurse_id: Uuid,
    pub service_request_id: Uuid,
    pub calificacion: i16,
    pub comentario: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TransactionRow {
    pub id: Uuid,
    pub nurse_id: Uuid,
    pub user_id: Uuid,
    pub service_request_id: Uuid,
    pub monto: f64,
    pub fecha_pago: DateTime<Utc>,
    pub estado: String,
}

// ---------------------------------------------------------------------------
// Support models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = support_requests)]
pub(crate) struct NewSupportRequestRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tipo_usuario: &'a str,
    pub asunto: &'a str,
    pub mensaje: &'a str,
    pub estado: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = faqs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FaqRow {
    pub id: Uuid,
    pub pregunta: String,
    pub respuesta: String,
}
