//! Identity store service: registration, login and profile management.
//!
//! Passwords are hashed on a blocking thread so slow hash parameters never
//! stall the async executor.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageWindow};
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::identity::UNVERIFIED;
use super::ports::{
    AccountsCommand, AccountsQuery, LoginService, NurseRepository, PasswordHasher, Registered,
    TokenService, UserRepository,
};
use super::repository_errors::{
    map_hasher_error, map_nurse_error, map_token_error, map_user_error,
};
use super::{
    Caller, Error, Identity, IssuedToken, LoginCredentials, NewNurse, NewUser, NurseAccount,
    NurseId, NurseProfile, NurseSearch, NurseUpdate, PasswordHash, Role, UserAccount, UserId,
    UserProfile, UserUpdate,
};

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

/// Account service implementing the identity driving ports.
#[derive(Clone)]
pub struct AccountService<U, N> {
    users: Arc<U>,
    nurses: Arc<N>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl<U, N> AccountService<U, N> {
    /// Create the service from its repositories and security adapters.
    pub fn new(
        users: Arc<U>,
        nurses: Arc<N>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            nurses,
            hasher,
            tokens,
        }
    }

    async fn hash_password(&self, password: Zeroizing<String>) -> Result<PasswordHash, Error> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_hasher_error)
    }

    async fn verify_password(&self, password: &str, hash: PasswordHash) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(password.as_str(), &hash))
            .await
            .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
            .map_err(map_hasher_error)
    }

    fn issue(&self, identity_id: uuid::Uuid, role: Role) -> Result<IssuedToken, Error> {
        self.tokens.issue(identity_id, role).map_err(map_token_error)
    }
}

impl<U, N> AccountService<U, N>
where
    U: UserRepository,
    N: NurseRepository,
{
    async fn find_identity(&self, role: Role, user_name: &str) -> Result<Option<Identity>, Error> {
        match role {
            Role::User => Ok(self
                .users
                .find_by_user_name(user_name)
                .await
                .map_err(map_user_error)?
                .map(Identity::User)),
            Role::Nurse => Ok(self
                .nurses
                .find_by_user_name(user_name)
                .await
                .map_err(map_nurse_error)?
                .map(Identity::Nurse)),
        }
    }

    async fn load_user(&self, id: UserId) -> Result<UserAccount, Error> {
        self.users
            .find_by_id(&id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    async fn load_nurse(&self, id: NurseId) -> Result<NurseAccount, Error> {
        self.nurses
            .find_by_id(&id)
            .await
            .map_err(map_nurse_error)?
            .ok_or_else(|| Error::not_found(format!("nurse {id} not found")))
    }
}

#[async_trait]
impl<U, N> LoginService for AccountService<U, N>
where
    U: UserRepository,
    N: NurseRepository,
{
    async fn login(
        &self,
        role: Role,
        credentials: &LoginCredentials,
    ) -> Result<IssuedToken, Error> {
        let Some(identity) = self.find_identity(role, credentials.username()).await? else {
            debug!(%role, "login rejected: unknown user name");
            return Err(invalid_credentials());
        };

        let matches = self
            .verify_password(credentials.password(), identity.password_hash().clone())
            .await?;
        if !matches {
            debug!(%role, "login rejected: password mismatch");
            return Err(invalid_credentials());
        }

        self.issue(identity.id(), identity.role())
    }
}

#[async_trait]
impl<U, N> AccountsCommand for AccountService<U, N>
where
    U: UserRepository,
    N: NurseRepository,
{
    async fn register_user(&self, new: NewUser) -> Result<Registered<UserProfile>, Error> {
        let NewUser {
            user_name,
            password,
            name,
            foto,
        } = new;
        let password_hash = self.hash_password(password).await?;
        let account = UserAccount {
            profile: UserProfile {
                id: UserId::random(),
                name,
                user_name,
                foto,
                verificado: UNVERIFIED.to_owned(),
            },
            password_hash,
        };

        self.users.insert(&account).await.map_err(map_user_error)?;
        info!(user_id = %account.profile.id, "user registered");

        let token = self.issue(*account.profile.id.as_uuid(), Role::User)?;
        Ok(Registered {
            profile: account.profile,
            token,
        })
    }

    async fn register_nurse(&self, new: NewNurse) -> Result<Registered<NurseProfile>, Error> {
        let NewNurse {
            user_name,
            password,
            name,
            fecha_nacimiento,
            genero,
            descripcion,
            especialidad,
            ubicacion,
            tarifa,
            disponibilidad,
            certificados,
        } = new;
        let password_hash = self.hash_password(password).await?;
        let account = NurseAccount {
            profile: NurseProfile {
                id: NurseId::random(),
                name,
                fecha_nacimiento,
                genero,
                descripcion,
                especialidad,
                ubicacion,
                tarifa,
                disponibilidad,
                certificados,
            },
            user_name,
            password_hash,
        };

        self.nurses.insert(&account).await.map_err(map_nurse_error)?;
        info!(nurse_id = %account.profile.id, "nurse registered");

        let token = self.issue(*account.profile.id.as_uuid(), Role::Nurse)?;
        Ok(Registered {
            profile: account.profile,
            token,
        })
    }

    async fn update_user(&self, caller: Caller, update: UserUpdate) -> Result<UserProfile, Error> {
        let id = caller.require_user()?;
        let mut profile = self.load_user(id).await?.profile;
        profile.apply(update);
        let updated = self
            .users
            .update_profile(&profile)
            .await
            .map_err(map_user_error)?;
        if !updated {
            return Err(Error::not_found(format!("user {id} not found")));
        }
        Ok(profile)
    }

    async fn update_nurse(
        &self,
        caller: Caller,
        update: NurseUpdate,
    ) -> Result<NurseProfile, Error> {
        let id = caller.require_nurse()?;
        let mut profile = self.load_nurse(id).await?.profile;
        profile.apply(update);
        let updated = self
            .nurses
            .update_profile(&profile)
            .await
            .map_err(map_nurse_error)?;
        if !updated {
            return Err(Error::not_found(format!("nurse {id} not found")));
        }
        Ok(profile)
    }
}

#[async_trait]
impl<U, N> AccountsQuery for AccountService<U, N>
where
    U: UserRepository,
    N: NurseRepository,
{
    async fn user_profile(&self, caller: Caller) -> Result<UserProfile, Error> {
        let id = caller.require_user()?;
        Ok(self.load_user(id).await?.profile)
    }

    async fn nurse_profile(&self, caller: Caller) -> Result<NurseProfile, Error> {
        let id = caller.require_nurse()?;
        Ok(self.load_nurse(id).await?.profile)
    }

    async fn list_users(&self, window: PageWindow) -> Result<Page<UserProfile>, Error> {
        self.users.list(window).await.map_err(map_user_error)
    }

    async fn search_nurses(
        &self,
        search: NurseSearch,
        window: PageWindow,
    ) -> Result<Page<NurseProfile>, Error> {
        self.nurses
            .search(&search, window)
            .await
            .map_err(map_nurse_error)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
