use tracing::*;

use crate::{
    api::{ApiManager, Cleanup},
    models::{LoginRequest, Role},
    Error, Result,
};

/// A logged-in account together with its own session.
#[derive(Debug, Clone)]
pub struct Actor {
    pub email: String,
    pub password: String,
    pub roles: Vec<Role>,
    /// Server-side id, when the account was created by the fixtures.
    pub id: Option<String>,
    pub api: ApiManager,
    /// Session of the super admin that created this account.
    owner: Option<ApiManager>,
}

impl Actor {
    /// Actor for an account that outlives the test, e.g. the super admin.
    pub fn new(email: String, password: String, roles: Vec<Role>, api: ApiManager) -> Actor {
        Actor {
            email,
            password,
            roles,
            id: None,
            api,
            owner: None,
        }
    }

    /// Actor whose account is deleted by `owner` on [`Actor::teardown`].
    pub(crate) fn owned(
        email: String,
        password: String,
        roles: Vec<Role>,
        id: String,
        api: ApiManager,
        owner: ApiManager,
    ) -> Actor {
        Actor {
            email,
            password,
            roles,
            id: Some(id),
            api,
            owner: Some(owner),
        }
    }

    pub fn creds(&self) -> LoginRequest {
        LoginRequest::new(self.email.clone(), self.password.clone())
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Deletes a fixture-created account and closes the session. Accounts
    /// not created by the fixtures are left alone and yield `None`.
    pub async fn teardown(self) -> Result<Option<Cleanup>> {
        let Actor { email, id, owner, .. } = self;
        match (owner, id) {
            (Some(owner), Some(id)) => {
                debug!("tearing down {email}");
                owner.user().clean_up_user(&id).await.map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Tears the actor down once the test body produced `outcome`, whether
    /// it passed or not. A failed body is reported ahead of a failed teardown.
    pub async fn teardown_after<T, E: From<Error>>(
        self,
        outcome: std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let teardown = self.teardown().await;
        let value = outcome?;
        teardown?;
        Ok(value)
    }
}
