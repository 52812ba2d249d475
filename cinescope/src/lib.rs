//! # Cinescope
//!
//! Authenticated HTTP harness for end-to-end tests of the Cinescope
//! movie-ticketing services (auth, movies, payment).
//!
//! ## Architecture (block diagram)
//!
//! ```text
//! +---------------------+      +---------------------+      +---------------------+
//! | fixtures            | ---> | Actor               | ---> | ApiManager          |
//! | super admin/admin/  |      | creds + roles +     |      | auth/user/movies/   |
//! | user, data gen      |      | own session         |      | genres/reviews/pay  |
//! +---------------------+      +---------------------+      +---------------------+
//!                                                                     |
//!                                                                     v
//! +---------------------+      +---------------------+      +---------------------+
//! | schema validation   | <--- | Response            | <--- | Requester           |
//! | Validate / Checker  |      | status + body       |      | expected status     |
//! +---------------------+      +---------------------+      +---------------------+
//!                                                                     |
//!                                                                     v
//!                              +---------------------+      +---------------------+
//!                              | config + masking    | ---> | transcript (curl-   |
//!                              | cinescope.toml/env  |      | like request log)   |
//!                              +---------------------+      +---------------------+
//! ```
//!
//! [`db`] gives row-level access to the service database, for seeding data
//! and checking what the API left behind.
//!
//! ## Example
//!
//! ```no_run
//! use cinescope::{models::MovieFilter, Fixtures, Role};
//!
//! # async fn run() -> cinescope::Result<()> {
//! let mut fixtures = Fixtures::new(cinescope::get_config());
//! let root = fixtures.super_admin().await?;
//! let user = fixtures.actor(Role::User, &root).await?;
//!
//! user.api
//!     .genres()
//!     .create_genre(&fixtures.data().genre())
//!     .expect_status(403u16)
//!     .send()
//!     .await?;
//! user.api.movies().get_movies(&MovieFilter::default()).send().await?;
//!
//! user.teardown().await?;
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod api;
pub mod config;
pub mod datagen;
pub mod db;
pub mod error;
pub mod fixtures;
pub mod http;
pub mod masking;
pub mod models;
pub mod schema;
pub mod session;
pub mod status;
pub mod transcript;

pub use actor::Actor;
pub use api::{ApiManager, Cleanup};
pub use config::{get_config, Config};
pub use datagen::DataGenerator;
pub use db::Database;
pub use error::{Error, Result};
pub use fixtures::{Fixtures, RegisteredUser};
pub use http::{Response, StatusCode};
pub use models::Role;
pub use schema::Validate;
pub use session::Session;
pub use status::ExpectedStatus;

// Re-export error handling crate
pub use eyre;
