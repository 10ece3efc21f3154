//! Service request lifecycle.
//!
//! A request moves forward through `pendiente → en_progreso → completado`.
//! Re-asserting the current state is accepted; moving backwards or out of
//! `completado` is not. Reviews and payment release are gated on
//! `completado`, messages on being a party of the request.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::{Caller, Error, NurseId, PatientId, ServiceRequestId, UserId};

/// `details.code` attached to lifecycle violations.
pub const INVALID_STATE_CODE: &str = "invalid_state";

/// Lifecycle state of a service request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Estado {
    /// Created, not yet started.
    Pendiente,
    /// The nurse has started the service.
    EnProgreso,
    /// Terminal state.
    Completado,
}

impl Estado {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pendiente => "pendiente",
            Self::EnProgreso => "en_progreso",
            Self::Completado => "completado",
        }
    }

    const fn rank(self) -> u8 {
        match self {
            Self::Pendiente => 0,
            Self::EnProgreso => 1,
            Self::Completado => 2,
        }
    }

    /// Whether a request in this state may move to `next`.
    ///
    /// # Examples
    /// ```
    /// use carematch::domain::Estado;
    ///
    /// assert!(Estado::Pendiente.can_transition_to(Estado::Completado));
    /// assert!(!Estado::Completado.can_transition_to(Estado::EnProgreso));
    /// ```
    pub const fn can_transition_to(self, next: Estado) -> bool {
        next.rank() >= self.rank()
    }

    /// Parse a raw value, failing with the invalid-state error.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        raw.parse().map_err(|()| {
            invalid_state(format!(
                "estado must be one of pendiente, en_progreso, completado; got {raw:?}"
            ))
        })
    }
}

impl fmt::Display for Estado {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Estado {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(Self::Pendiente),
            "en_progreso" => Ok(Self::EnProgreso),
            "completado" => Ok(Self::Completado),
            _ => Err(()),
        }
    }
}

/// Build an `invalid_request` error tagged as a lifecycle violation.
pub fn invalid_state(message: impl Into<String>) -> Error {
    Error::invalid_request(message)
        .with_details(json!({ "field": "estado", "code": INVALID_STATE_CODE }))
}

/// A request for care from a user to a nurse.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ServiceRequest {
    pub id: ServiceRequestId,
    pub user_id: UserId,
    pub nurse_id: NurseId,
    pub patient_ids: Vec<PatientId>,
    pub estado: Estado,
    pub detalles: String,
    pub fecha: DateTime<Utc>,
    pub tarifa: f64,
    pub pago_realizado: bool,
    pub pago_liberado: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload. Nurse and patient ids are stored as given.
#[derive(Debug, Clone, PartialEq)]
pub struct NewServiceRequest {
    pub user_id: UserId,
    pub nurse_id: NurseId,
    pub patient_ids: Vec<PatientId>,
    pub estado: Estado,
    pub detalles: String,
    pub fecha: DateTime<Utc>,
    pub tarifa: f64,
    pub pago_realizado: bool,
    pub pago_liberado: bool,
}

impl ServiceRequest {
    /// Build a stored request from a creation payload.
    pub fn create(id: ServiceRequestId, new: NewServiceRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: new.user_id,
            nurse_id: new.nurse_id,
            patient_ids: new.patient_ids,
            estado: new.estado,
            detalles: new.detalles,
            fecha: new.fecha,
            tarifa: new.tarifa,
            pago_realizado: new.pago_realizado,
            pago_liberado: new.pago_liberado,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `caller` is the requesting user or the assigned nurse.
    pub fn is_party(&self, caller: &Caller) -> bool {
        caller.is_party(self.user_id, self.nurse_id)
    }

    /// Fail with `forbidden` unless `caller` is a party.
    pub fn ensure_party(&self, caller: &Caller) -> Result<(), Error> {
        if self.is_party(caller) {
            Ok(())
        } else {
            Err(Error::forbidden(
                "caller is not a party to this service request",
            ))
        }
    }

    /// Move to `next`, leaving the request untouched on failure.
    pub fn transition(&mut self, next: Estado, now: DateTime<Utc>) -> Result<(), Error> {
        if !self.estado.can_transition_to(next) {
            return Err(invalid_state(format!(
                "cannot move service request from {} to {next}",
                self.estado
            )));
        }
        self.estado = next;
        self.updated_at = now;
        Ok(())
    }

    /// Record that the user has paid.
    pub fn mark_paid(&mut self, now: DateTime<Utc>) -> Result<(), Error> {
        if self.pago_realizado {
            return Err(Error::conflict("service request has already been paid"));
        }
        self.pago_realizado = true;
        self.updated_at = now;
        Ok(())
    }

    /// Release a completed, paid request's payment to the nurse.
    pub fn release_payment(&mut self, now: DateTime<Utc>) -> Result<(), Error> {
        if self.estado != Estado::Completado {
            return Err(invalid_state(
                "payment can only be released once the service is completado",
            ));
        }
        if !self.pago_realizado {
            return Err(Error::invalid_request("service request has not been paid")
                .with_details(json!({ "field": "pago_realizado", "code": "not_paid" })));
        }
        if self.pago_liberado {
            return Err(Error::conflict("payment has already been released"));
        }
        self.pago_liberado = true;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, Role};
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0)
            .single()
            .expect("valid fixture time")
    }

    #[fixture]
    fn request() -> ServiceRequest {
        ServiceRequest::create(
            ServiceRequestId::random(),
            NewServiceRequest {
                user_id: UserId::random(),
                nurse_id: NurseId::random(),
                patient_ids: vec![PatientId::random()],
                estado: Estado::Pendiente,
                detalles: "checkup".to_owned(),
                fecha: at(0),
                tarifa: 50.0,
                pago_realizado: false,
                pago_liberado: false,
            },
            at(1),
        )
    }

    #[rstest]
    #[case(Estado::Pendiente, Estado::Pendiente, true)]
    #[case(Estado::Pendiente, Estado::EnProgreso, true)]
    #[case(Estado::Pendiente, Estado::Completado, true)]
    #[case(Estado::EnProgreso, Estado::Pendiente, false)]
    #[case(Estado::EnProgreso, Estado::Completado, true)]
    #[case(Estado::Completado, Estado::Completado, true)]
    #[case(Estado::Completado, Estado::Pendiente, false)]
    #[case(Estado::Completado, Estado::EnProgreso, false)]
    fn transition_table(#[case] from: Estado, #[case] to: Estado, #[case] allowed: bool) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[rstest]
    #[case("cancelado")]
    #[case("")]
    #[case("Completado")]
    fn unknown_values_are_invalid_state(#[case] raw: &str) {
        let err = Estado::parse(raw).expect_err("unknown estado");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.detail_code(), Some(INVALID_STATE_CODE));
    }

    #[rstest]
    fn rejected_transition_leaves_state(mut request: ServiceRequest) {
        request
            .transition(Estado::Completado, at(2))
            .expect("forward move");
        let err = request
            .transition(Estado::EnProgreso, at(3))
            .expect_err("backward move");
        assert_eq!(err.detail_code(), Some(INVALID_STATE_CODE));
        assert_eq!(request.estado, Estado::Completado);
        assert_eq!(request.updated_at, at(2));
    }

    #[rstest]
    fn parties_are_user_and_nurse(request: ServiceRequest) {
        let user = Caller::new(*request.user_id.as_uuid(), Role::User);
        let nurse = Caller::new(*request.nurse_id.as_uuid(), Role::Nurse);
        let stranger = Caller::new(uuid::Uuid::new_v4(), Role::User);
        assert!(request.is_party(&user));
        assert!(request.is_party(&nurse));
        assert_eq!(
            request
                .ensure_party(&stranger)
                .expect_err("stranger")
                .code(),
            ErrorCode::Forbidden
        );
    }

    #[rstest]
    fn paying_twice_conflicts(mut request: ServiceRequest) {
        request.mark_paid(at(2)).expect("first payment");
        let err = request.mark_paid(at(3)).expect_err("second payment");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    fn release_requires_completion_then_payment(mut request: ServiceRequest) {
        let err = request.release_payment(at(2)).expect_err("pending");
        assert_eq!(err.detail_code(), Some(INVALID_STATE_CODE));

        request.transition(Estado::Completado, at(2)).expect("complete");
        let err = request.release_payment(at(3)).expect_err("unpaid");
        assert_eq!(err.detail_code(), Some("not_paid"));

        request.mark_paid(at(3)).expect("pay");
        request.release_payment(at(4)).expect("release");
        assert!(request.pago_liberado);
    }
}
