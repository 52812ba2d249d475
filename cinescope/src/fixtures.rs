//! Actor factory.
//!
//! ```text
//! super_admin() ──creds from Config──────────────────────────> Actor(SUPER_ADMIN)
//!      │
//!      ├─ common_user() : POST /user ─> fresh session login ─> Actor(USER)
//!      └─ admin()       : POST /user ─> PATCH roles ─> login ─> Actor(ADMIN)
//! ```
//!
//! Every actor gets its own [`Session`](crate::session::Session), so tokens
//! never leak between actors built in the same process.

use rand::{rngs::StdRng, Rng};
use tracing::*;

use crate::{
    actor::Actor,
    api::{ApiManager, Cleanup},
    config::Config,
    datagen::DataGenerator,
    models::{LoginRequest, Role, UpdateUser, User, UserData},
    Result,
};

/// An account created through `POST /register`.
#[derive(Debug, Clone)]
pub struct RegisteredUser {
    pub data: UserData,
    pub id: String,
}

pub struct Fixtures<R: Rng = StdRng> {
    config: Config,
    data: DataGenerator<R>,
}

impl Fixtures<StdRng> {
    pub fn new(config: &Config) -> Fixtures<StdRng> {
        Fixtures::with_generator(config, DataGenerator::new())
    }
}

impl<R: Rng> Fixtures<R> {
    pub fn with_generator(config: &Config, data: DataGenerator<R>) -> Fixtures<R> {
        Fixtures {
            config: config.clone(),
            data,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data(&mut self) -> &mut DataGenerator<R> {
        &mut self.data
    }

    pub fn unauthenticated(&self) -> ApiManager {
        ApiManager::new(&self.config)
    }

    pub async fn super_admin(&self) -> Result<Actor> {
        let (username, password) = self.config.super_admin.credentials()?;
        let mut api = self.unauthenticated();
        api.authenticate(&LoginRequest::new(username, password)).await?;
        Ok(Actor::new(
            username.to_string(),
            password.to_string(),
            vec![Role::SuperAdmin],
            api,
        ))
    }

    pub async fn common_user(&mut self, super_admin: &Actor) -> Result<Actor> {
        self.create_actor(super_admin, Role::User).await
    }

    pub async fn admin(&mut self, super_admin: &Actor) -> Result<Actor> {
        self.create_actor(super_admin, Role::Admin).await
    }

    /// Actor of the given role; a super admin gets its own session.
    pub async fn actor(&mut self, role: Role, super_admin: &Actor) -> Result<Actor> {
        match role {
            Role::User => self.common_user(super_admin).await,
            Role::Admin => self.admin(super_admin).await,
            Role::SuperAdmin => self.super_admin().await,
        }
    }

    async fn create_actor(&mut self, super_admin: &Actor, role: Role) -> Result<Actor> {
        let data = self.creation_user_data();
        let user: User = super_admin
            .api
            .user()
            .create_user(&data)
            .send()
            .await?
            .validated()?;

        let api = match self.promote_and_login(super_admin, &user, &data, role).await {
            Ok(api) => api,
            Err(e) => {
                warn!("setting up {role} actor {} failed, removing the account", data.email);
                if let Err(cleanup) = super_admin.api.user().clean_up_user(&user.id).await {
                    warn!("could not remove {}: {cleanup}", data.email);
                }
                return Err(e);
            }
        };
        debug!("created {role} actor {}", data.email);

        Ok(Actor::owned(
            data.email,
            data.password,
            vec![role],
            user.id,
            api,
            super_admin.api.clone(),
        ))
    }

    async fn promote_and_login(
        &self,
        super_admin: &Actor,
        user: &User,
        data: &UserData,
        role: Role,
    ) -> Result<ApiManager> {
        if role != Role::User {
            super_admin
                .api
                .user()
                .patch_user(&user.id, &UpdateUser::roles([role]))
                .send()
                .await?;
        }

        let mut api = self.unauthenticated();
        api.authenticate(&data.login()).await?;
        Ok(api)
    }

    /// Self-registration payload.
    pub fn test_user(&mut self) -> UserData {
        self.data.user_data()
    }

    /// Payload for `POST /user`, already verified and not banned.
    pub fn creation_user_data(&mut self) -> UserData {
        UserData {
            verified: Some(true),
            banned: Some(false),
            ..self.data.user_data()
        }
    }

    pub async fn registered_user(&mut self) -> Result<RegisteredUser> {
        let data = self.test_user();
        let user: User = self
            .unauthenticated()
            .auth()
            .register_user(&data)
            .send()
            .await?
            .validated()?;
        Ok(RegisteredUser { data, id: user.id })
    }

    /// Logs in as `user` and deletes the account, tolerating 404.
    pub async fn clean_up_registered(&self, user: &RegisteredUser) -> Result<Cleanup> {
        let mut api = self.unauthenticated();
        api.authenticate(&user.data.login()).await?;
        let cleanup = api.user().clean_up_user(&user.id).await?;
        if cleanup == Cleanup::AlreadyGone {
            info!("registered user {} was already removed", user.data.email);
        }
        Ok(cleanup)
    }
}
