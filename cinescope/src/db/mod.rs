//! Direct access to the Cinescope Postgres database.
//!
//! Tests use it to seed rows the API cannot create and to confirm what an API
//! call left behind. Every write is a single statement run outside an explicit
//! transaction, so it is committed by the time the helper returns.
//!
//! ```rust,ignore
//! let db = Database::connect(&get_config().database).await?;
//! let genre = db.genres().create(&format!("Noir {}", Uuid::new_v4())).await?;
//! assert_eq!(db.genres().by_name(&genre.name).await?, Some(genre.clone()));
//! db.genres().delete(genre.id).await?;
//! ```

mod accounts;
mod genres;
mod movies;
mod payments;
mod reviews;
mod users;

pub use accounts::{AccountRow, Accounts};
pub use genres::{GenreRow, Genres};
pub use movies::{MovieRow, Movies};
pub use payments::{NewPayment, PaymentRow, Payments};
pub use reviews::{ReviewRow, Reviews};
pub use users::{NewUser, UserRow, Users};

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::*;

use crate::{api::Cleanup, config::DatabaseConfig, Result};

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Pooled connection to the service database with one helper per table.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> Result<Database> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(connect_options(config))
            .await?;
        debug!(host = %config.host, port = config.port, name = %config.name, "connected to database");
        Ok(Database { pool })
    }

    pub fn with_pool(pool: PgPool) -> Database {
        Database { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(&self.pool)
    }

    pub fn movies(&self) -> Movies<'_> {
        Movies::new(&self.pool)
    }

    pub fn genres(&self) -> Genres<'_> {
        Genres::new(&self.pool)
    }

    pub fn reviews(&self) -> Reviews<'_> {
        Reviews::new(&self.pool)
    }

    pub fn payments(&self) -> Payments<'_> {
        Payments::new(&self.pool)
    }

    pub fn accounts(&self) -> Accounts<'_> {
        Accounts::new(&self.pool)
    }

    pub async fn total_users(&self) -> Result<i64> {
        count(&self.pool, "users").await
    }

    pub async fn total_movies(&self) -> Result<i64> {
        count(&self.pool, "movies").await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Connection options built field by field, so credentials need no URL escaping.
pub fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.name)
        .username(&config.user)
        .password(&config.password)
}

async fn count(pool: &PgPool, table: &'static str) -> Result<i64> {
    let total = sqlx::query_scalar::<_, i64>(&format!("SELECT count(*) FROM {table}"))
        .fetch_one(pool)
        .await?;
    Ok(total)
}

/// Maps the row count of a `DELETE` onto the cleanup vocabulary of the API layer.
pub(crate) fn deleted(rows_affected: u64, what: impl std::fmt::Display) -> Cleanup {
    if rows_affected == 0 {
        info!("{what} not found during cleanup, possibly already deleted");
        Cleanup::AlreadyGone
    } else {
        debug!("deleted {what}");
        Cleanup::Deleted
    }
}


/// Tests against a live database named by `cinescope.toml` or the `DB_*`
/// variables. Run with `cargo test -- --ignored`.
#[cfg(test)]
pub(crate) mod live {
    use super::Database;
    use crate::config::Config;

    pub async fn database() -> Database {
        let config = Config::load_lenient();
        Database::connect(&config.database)
            .await
            .expect("database from DB_* settings")
    }
}
