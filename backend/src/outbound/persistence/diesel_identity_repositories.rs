//! PostgreSQL-backed user and nurse repositories.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageWindow};
use tracing::warn;

use crate::domain::ports::{
    NurseRepository, NurseRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    AvailabilitySlot, NurseAccount, NurseId, NurseProfile, NurseSearch, PasswordHash,
    UserAccount, UserId, UserProfile,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::diesel_helpers::{page_bounds, row_count};
use super::models::{NurseProfileChangeset, NurseRow, UserProfileChangeset, UserRow};
use super::pool::DbPool;
use super::schema::{nurses, users};

/// Diesel implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn user_row(account: &UserAccount) -> UserRow {
    UserRow {
        id: *account.profile.id.as_uuid(),
        user_name: account.profile.user_name.clone(),
        password_hash: account.password_hash.as_str().to_owned(),
        name: account.profile.name.clone(),
        foto: account.profile.foto.clone(),
        verificado: account.profile.verificado.clone(),
    }
}

fn row_to_user(row: UserRow) -> UserAccount {
    UserAccount {
        profile: UserProfile {
            id: UserId::from_uuid(row.id),
            name: row.name,
            user_name: row.user_name,
            foto: row.foto,
            verificado: row.verificado,
        },
        password_hash: PasswordHash::new(row.password_hash),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(user_row(account))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| match map_diesel_error(err) {
                UserRepositoryError::DuplicateUserName { .. } => {
                    UserRepositoryError::duplicate_user_name(account.profile.user_name.as_str())
                }
                other => other,
            })
    }

    async fn find_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::user_name.eq(user_name))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_user))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_user))
    }

    async fn update_profile(&self, profile: &UserProfile) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserProfileChangeset {
            name: profile.name.as_str(),
            foto: profile.foto.as_deref(),
        };
        let updated = diesel::update(users::table.find(profile.id.as_uuid()))
            .set(changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn list(&self, window: PageWindow) -> Result<Page<UserProfile>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (offset, limit) = page_bounds(window);
        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<UserRow> = users::table
            .order((users::created_at.asc(), users::id.asc()))
            .offset(offset)
            .limit(limit)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let items = rows.into_iter().map(|row| row_to_user(row).profile).collect();
        Ok(Page::new(window, row_count(total), items))
    }
}

/// Diesel implementation of the [`NurseRepository`] port.
#[derive(Clone)]
pub struct DieselNurseRepository {
    pool: DbPool,
}

impl DieselNurseRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn availability_json(slots: &[AvailabilitySlot]) -> serde_json::Value {
    serde_json::to_value(slots).unwrap_or_else(|err| {
        warn!(error = %err, "failed to encode availability, storing empty list");
        serde_json::Value::Array(Vec::new())
    })
}

fn row_to_nurse(row: NurseRow) -> NurseAccount {
    let disponibilidad = serde_json::from_value(row.disponibilidad).unwrap_or_else(|err| {
        warn!(nurse_id = %row.id, error = %err, "unreadable availability, returning empty list");
        Vec::new()
    });
    NurseAccount {
        profile: NurseProfile {
            id: NurseId::from_uuid(row.id),
            name: row.name,
            fecha_nacimiento: row.fecha_nacimiento,
            genero: row.genero,
            descripcion: row.descripcion,
            especialidad: row.especialidad,
            ubicacion: row.ubicacion,
            tarifa: row.tarifa,
            disponibilidad,
            certificados: row.certificados,
        },
        user_name: row.user_name,
        password_hash: PasswordHash::new(row.password_hash),
    }
}

/// Apply the optional search filters to a nurses query.
fn filtered(search: &NurseSearch) -> nurses::BoxedQuery<'_, diesel::pg::Pg> {
    let mut query = nurses::table.into_boxed();
    if let Some(especialidad) = search.especialidad.as_deref() {
        query = query.filter(nurses::especialidad.eq(especialidad));
    }
    if let Some(ubicacion) = search.ubicacion.as_deref() {
        query = query.filter(nurses::ubicacion.eq(ubicacion));
    }
    if let Some(tarifa_max) = search.tarifa_max {
        query = query.filter(nurses::tarifa.le(tarifa_max));
    }
    query
}

#[async_trait]
impl NurseRepository for DieselNurseRepository {
    async fn insert(&self, account: &NurseAccount) -> Result<(), NurseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let profile = &account.profile;
        let row = NurseRow {
            id: *profile.id.as_uuid(),
            user_name: account.user_name.clone(),
            password_hash: account.password_hash.as_str().to_owned(),
            name: profile.name.clone(),
            fecha_nacimiento: profile.fecha_nacimiento.clone(),
            genero: profile.genero.clone(),
            descripcion: profile.descripcion.clone(),
            especialidad: profile.especialidad.clone(),
            ubicacion: profile.ubicacion.clone(),
            tarifa: profile.tarifa,
            disponibilidad: availability_json(&profile.disponibilidad),
            certificados: profile.certificados.clone(),
        };
        diesel::insert_into(nurses::table)
            .values(row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| match map_diesel_error(err) {
                NurseRepositoryError::DuplicateUserName { .. } => {
                    NurseRepositoryError::duplicate_user_name(account.user_name.as_str())
                }
                other => other,
            })
    }

    async fn find_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<NurseAccount>, NurseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<NurseRow> = nurses::table
            .filter(nurses::user_name.eq(user_name))
            .select(NurseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_nurse))
    }

    async fn find_by_id(&self, id: &NurseId) -> Result<Option<NurseAccount>, NurseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<NurseRow> = nurses::table
            .find(id.as_uuid())
            .select(NurseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_nurse))
    }

    async fn update_profile(&self, profile: &NurseProfile) -> Result<bool, NurseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = NurseProfileChangeset {
            name: profile.name.as_str(),
            fecha_nacimiento: profile.fecha_nacimiento.as_str(),
            genero: profile.genero.as_str(),
            descripcion: profile.descripcion.as_deref(),
            especialidad: profile.especialidad.as_str(),
            ubicacion: profile.ubicacion.as_str(),
            tarifa: profile.tarifa,
            disponibilidad: availability_json(&profile.disponibilidad),
            certificados: &profile.certificados,
        };
        let updated = diesel::update(nurses::table.find(profile.id.as_uuid()))
            .set(changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn search(
        &self,
        search: &NurseSearch,
        window: PageWindow,
    ) -> Result<Page<NurseProfile>, NurseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (offset, limit) = page_bounds(window);
        let total: i64 = filtered(search)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<NurseRow> = filtered(search)
            .order((nurses::created_at.asc(), nurses::id.asc()))
            .offset(offset)
            .limit(limit)
            .select(NurseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let items = rows
            .into_iter()
            .map(|row| row_to_nurse(row).profile)
            .collect();
        Ok(Page::new(window, row_count(total), items))
    }
}
