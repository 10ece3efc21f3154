//! User and nurse identities.
//!
//! Users and nurses live in separate collections with separate username
//! uniqueness domains. [`Identity`] is the tagged union the login flow works
//! with; profile types carry only the public attributes and never the
//! credential.

use std::fmt;

use pagination::ItemsKey;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::{NurseId, Role, UserId};

/// Default value of [`UserProfile::verificado`] for new accounts.
pub const UNVERIFIED: &str = "No";

/// Stored credential in PHC string format.
///
/// `Debug` never prints the hash.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a PHC string produced by a password hasher.
    pub fn new(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// The PHC string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// One weekly availability window advertised by a nurse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AvailabilitySlot {
    /// Day name, e.g. `"Lunes"`.
    pub dia: String,
    /// Start time, e.g. `"08:00"`.
    #[serde(rename = "horaInicio")]
    pub hora_inicio: String,
    /// End time, e.g. `"17:00"`.
    #[serde(rename = "horaFin")]
    pub hora_fin: String,
}

/// Public attributes of a user account.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub user_name: String,
    pub foto: Option<String>,
    pub verificado: String,
}

impl ItemsKey for UserProfile {
    const ITEMS_KEY: &'static str = "users";
}

/// Public attributes of a nurse account.
///
/// The username is deliberately absent; it lives on [`NurseAccount`].
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct NurseProfile {
    pub id: NurseId,
    pub name: String,
    pub fecha_nacimiento: String,
    pub genero: String,
    pub descripcion: Option<String>,
    pub especialidad: String,
    pub ubicacion: String,
    pub tarifa: f64,
    pub disponibilidad: Vec<AvailabilitySlot>,
    pub certificados: Vec<String>,
}

impl ItemsKey for NurseProfile {
    const ITEMS_KEY: &'static str = "nurses";
}

/// A stored user profile together with its credential.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    pub profile: UserProfile,
    pub password_hash: PasswordHash,
}

/// A stored nurse profile together with its login name and credential.
#[derive(Debug, Clone, PartialEq)]
pub struct NurseAccount {
    pub profile: NurseProfile,
    pub user_name: String,
    pub password_hash: PasswordHash,
}

/// Either kind of account able to log in.
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    User(UserAccount),
    Nurse(NurseAccount),
}

impl Identity {
    /// Raw identity id embedded in tokens.
    pub fn id(&self) -> Uuid {
        match self {
            Self::User(account) => *account.profile.id.as_uuid(),
            Self::Nurse(account) => *account.profile.id.as_uuid(),
        }
    }

    /// Fixed role for the identity's collection.
    pub fn role(&self) -> Role {
        match self {
            Self::User(_) => Role::User,
            Self::Nurse(_) => Role::Nurse,
        }
    }

    /// Login name.
    pub fn user_name(&self) -> &str {
        match self {
            Self::User(account) => account.profile.user_name.as_str(),
            Self::Nurse(account) => account.user_name.as_str(),
        }
    }

    /// Stored credential.
    pub fn password_hash(&self) -> &PasswordHash {
        match self {
            Self::User(account) => &account.password_hash,
            Self::Nurse(account) => &account.password_hash,
        }
    }
}

/// Validated registration payload for a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub password: Zeroizing<String>,
    pub name: String,
    pub foto: Option<String>,
}

/// Validated registration payload for a nurse.
#[derive(Debug, Clone)]
pub struct NewNurse {
    pub user_name: String,
    pub password: Zeroizing<String>,
    pub name: String,
    pub fecha_nacimiento: String,
    pub genero: String,
    pub descripcion: Option<String>,
    pub especialidad: String,
    pub ubicacion: String,
    pub tarifa: f64,
    pub disponibilidad: Vec<AvailabilitySlot>,
    pub certificados: Vec<String>,
}

/// Partial update of a user profile; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub foto: Option<String>,
}

impl UserProfile {
    /// Apply the present fields of `update`.
    pub fn apply(&mut self, update: UserUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(foto) = update.foto {
            self.foto = Some(foto);
        }
    }
}

/// Partial update of a nurse profile; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NurseUpdate {
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

impl NurseProfile {
    /// Apply the present fields of `update`.
    pub fn apply(&mut self, update: NurseUpdate) {
        let NurseUpdate {
            name,
            fecha_nacimiento,
            genero,
            descripcion,
            especialidad,
            ubicacion,
            tarifa,
            disponibilidad,
            certificados,
        } = update;
        if let Some(value) = name {
            self.name = value;
        }
        if let Some(value) = fecha_nacimiento {
            self.fecha_nacimiento = value;
        }
        if let Some(value) = genero {
            self.genero = value;
        }
        if let Some(value) = descripcion {
            self.descripcion = Some(value);
        }
        if let Some(value) = especialidad {
            self.especialidad = value;
        }
        if let Some(value) = ubicacion {
            self.ubicacion = value;
        }
        if let Some(value) = tarifa {
            self.tarifa = value;
        }
        if let Some(value) = disponibilidad {
            self.disponibilidad = value;
        }
        if let Some(value) = certificados {
            self.certificados = value;
        }
    }
}

/// Nurse directory filter.
///
/// `especialidad` and `ubicacion` match exactly; `tarifa_max` keeps nurses
/// whose fee is at most the given value. Absent criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NurseSearch {
    pub especialidad: Option<String>,
    pub ubicacion: Option<String>,
    pub tarifa_max: Option<f64>,
}

impl NurseSearch {
    /// Whether `nurse` satisfies every present criterion.
    pub fn matches(&self, nurse: &NurseProfile) -> bool {
        self.especialidad
            .as_deref()
            .is_none_or(|value| nurse.especialidad == value)
            && self
                .ubicacion
                .as_deref()
                .is_none_or(|value| nurse.ubicacion == value)
            && self.tarifa_max.is_none_or(|max| nurse.tarifa <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn nurse() -> NurseProfile {
        NurseProfile {
            id: NurseId::random(),
            name: "Lucía".to_owned(),
            fecha_nacimiento: "1990-02-03".to_owned(),
            genero: "F".to_owned(),
            descripcion: None,
            especialidad: "pediatria".to_owned(),
            ubicacion: "Madrid".to_owned(),
            tarifa: 50.0,
            disponibilidad: Vec::new(),
            certificados: Vec::new(),
        }
    }

    #[rstest]
    #[case(NurseSearch::default(), true)]
    #[case(NurseSearch { tarifa_max: Some(40.0), ..NurseSearch::default() }, false)]
    #[case(NurseSearch { tarifa_max: Some(50.0), ..NurseSearch::default() }, true)]
    #[case(NurseSearch { especialidad: Some("pediatria".into()), ..NurseSearch::default() }, true)]
    #[case(NurseSearch { especialidad: Some("Pediatria".into()), ..NurseSearch::default() }, false)]
    #[case(NurseSearch { ubicacion: Some("Sevilla".into()), ..NurseSearch::default() }, false)]
    fn search_criteria(nurse: NurseProfile, #[case] search: NurseSearch, #[case] expected: bool) {
        assert_eq!(search.matches(&nurse), expected);
    }

    #[rstest]
    fn nurse_profile_never_serialises_credentials(nurse: NurseProfile) {
        let value = serde_json::to_value(&nurse).expect("profile serialises");
        assert!(value.get("user_name").is_none());
        assert!(value.get("password").is_none());
    }

    #[rstest]
    fn partial_update_leaves_absent_fields(mut nurse: NurseProfile) {
        nurse.apply(NurseUpdate {
            tarifa: Some(35.0),
            ..NurseUpdate::default()
        });
        assert!((nurse.tarifa - 35.0).abs() < f64::EPSILON);
        assert_eq!(nurse.especialidad, "pediatria");
    }

    #[rstest]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("$argon2id$v=19$secret");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }
}
