use sqlx::{FromRow, PgPool};
use tracing::*;

use super::deleted;
use crate::{api::Cleanup, Result};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct GenreRow {
    pub id: i32,
    pub name: String,
}

pub struct Genres<'a> {
    pool: &'a PgPool,
}

impl<'a> Genres<'a> {
    pub(super) fn new(pool: &'a PgPool) -> Genres<'a> {
        Genres { pool }
    }

    pub async fn create(&self, name: &str) -> Result<GenreRow> {
        let row = sqlx::query_as::<_, GenreRow>("INSERT INTO genres (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(self.pool)
            .await?;
        debug!(id = row.id, "inserted genre {name}");
        Ok(row)
    }

    pub async fn by_id(&self, id: i64) -> Result<Option<GenreRow>> {
        let row = sqlx::query_as::<_, GenreRow>("SELECT id, name FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    pub async fn by_name(&self, name: &str) -> Result<Option<GenreRow>> {
        let row = sqlx::query_as::<_, GenreRow>("SELECT id, name FROM genres WHERE name = $1")
            .bind(name)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    pub async fn rename(&self, id: i64, name: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE genres SET name = $2 WHERE id = $1")
            .bind(id)
            .bind(name)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i64) -> Result<Cleanup> {
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(deleted(result.rows_affected(), format_args!("genre {id}")))
    }
}
