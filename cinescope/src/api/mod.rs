//! Per-resource facades and the [`ApiManager`] that bundles them.
//!
//! Every facade method returns a [`RequestBuilder`] preloaded with the verb,
//! path, body and the happy-path status. Callers may override any of it
//! before `send().await`:
//!
//! ```rust,ignore
//! let res = api
//!     .genres()
//!     .create_genre(&GenreRequest::new("Drama"))
//!     .expect_status(403u16)
//!     .send()
//!     .await?;
//! ```

mod auth;
mod genres;
mod movies;
mod payment;
mod reviews;
mod user;

pub use auth::AuthApi;
pub use genres::GenresApi;
pub use movies::MoviesApi;
pub use payment::PaymentApi;
pub use reviews::ReviewsApi;
pub use user::UserApi;

use std::fmt::Display;
use tracing::*;

use crate::{
    config::{Config, Services},
    http::{RequestBuilder, Requester, StatusCode},
    models::LoginRequest,
    session::Session,
    Error, Result,
};

/// Result of a best-effort delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cleanup {
    Deleted,
    /// The resource answered 404.
    AlreadyGone,
}

/// Sends a delete, downgrading a 404 to [`Cleanup::AlreadyGone`]. Any other
/// failure, including other status mismatches, is returned unchanged.
pub(crate) async fn delete_if_exists(request: RequestBuilder<'_>, what: impl Display) -> Result<Cleanup> {
    match request.send().await {
        Ok(_) => Ok(Cleanup::Deleted),
        Err(Error::UnexpectedStatus { actual, .. }) if actual == StatusCode::NOT_FOUND => {
            info!("{what} not found during cleanup, possibly already deleted");
            Ok(Cleanup::AlreadyGone)
        }
        Err(e) => {
            warn!("cleanup of {what} failed: {e}");
            Err(e)
        }
    }
}

/// One session shared by all facades of one actor.
#[derive(Debug, Clone)]
pub struct ApiManager {
    session: Session,
    services: Services,
    login_status: u16,
}

impl ApiManager {
    /// Fresh, unauthenticated session against the configured services.
    pub fn new(config: &Config) -> ApiManager {
        ApiManager::with_session(Session::new(), config)
    }

    pub fn with_session(session: Session, config: &Config) -> ApiManager {
        ApiManager {
            session,
            services: config.services.clone(),
            login_status: config.login_status,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Logs in and switches this manager to a session carrying the token.
    /// Sessions cloned before the call keep their previous headers.
    pub async fn authenticate(&mut self, credentials: &LoginRequest) -> Result<()> {
        let token = self.auth().login_token(credentials).await?;
        self.session = self.session.with_bearer(&token)?;
        debug!("session authenticated as {}", credentials.email);
        Ok(())
    }

    /// Drops the bearer token, keeping the transport.
    pub fn sign_out(&mut self) {
        self.session = self.session.signed_out();
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(Requester::new(&self.session, &self.services.auth), self.login_status)
    }

    pub fn user(&self) -> UserApi<'_> {
        UserApi::new(Requester::new(&self.session, &self.services.auth))
    }

    pub fn movies(&self) -> MoviesApi<'_> {
        MoviesApi::new(Requester::new(&self.session, &self.services.movies))
    }

    pub fn genres(&self) -> GenresApi<'_> {
        GenresApi::new(Requester::new(&self.session, &self.services.movies))
    }

    pub fn reviews(&self) -> ReviewsApi<'_> {
        ReviewsApi::new(Requester::new(&self.session, &self.services.movies))
    }

    pub fn payment(&self) -> PaymentApi<'_> {
        PaymentApi::new(Requester::new(&self.session, &self.services.payment))
    }
}
