//! Patients owned by user accounts.

use pagination::ItemsKey;
use serde::Serialize;
use utoipa::ToSchema;

use super::{Caller, Error, PatientId, UserId};

/// A patient record. Deleting or editing it never touches service requests
/// that reference its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub fecha_nacimiento: String,
    pub genero: String,
    pub movilidad: String,
    pub descripcion: String,
    pub usuario_id: UserId,
}

impl ItemsKey for Patient {
    const ITEMS_KEY: &'static str = "patients";
}

impl Patient {
    /// Build a stored patient from a creation payload.
    pub fn create(id: PatientId, new: NewPatient) -> Self {
        Self {
            id,
            name: new.name,
            fecha_nacimiento: new.fecha_nacimiento,
            genero: new.genero,
            movilidad: new.movilidad,
            descripcion: new.descripcion,
            usuario_id: new.usuario_id,
        }
    }

    /// Fail with `forbidden` unless `caller` is the owning user.
    pub fn ensure_owner(&self, caller: &Caller) -> Result<(), Error> {
        if caller.user_id() == Some(self.usuario_id) {
            Ok(())
        } else {
            Err(Error::forbidden("only the owning user may modify this patient"))
        }
    }

    /// Apply the present fields of `update`.
    pub fn apply(&mut self, update: PatientUpdate) {
        if let Some(value) = update.name {
            self.name = value;
        }
        if let Some(value) = update.fecha_nacimiento {
            self.fecha_nacimiento = value;
        }
        if let Some(value) = update.genero {
            self.genero = value;
        }
        if let Some(value) = update.movilidad {
            self.movilidad = value;
        }
        if let Some(value) = update.descripcion {
            self.descripcion = value;
        }
    }
}

/// Validated creation payload; every field is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatient {
    pub usuario_id: UserId,
    pub name: String,
    pub fecha_nacimiento: String,
    pub genero: String,
    pub movilidad: String,
    pub descripcion: String,
}

/// Partial update of a patient. Ownership cannot change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub fecha_nacimiento: Option<String>,
    pub genero: Option<String>,
    pub movilidad: Option<String>,
    pub descripcion: Option<String>,
}
