use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use tracing::*;

use super::deleted;
use crate::{api::Cleanup, models::Role, Result};

const COLUMNS: &str =
    "id, email, full_name, password, created_at, updated_at, verified, banned, roles::text AS roles";

/// Row of the `users` table. `password` holds the stored hash.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub verified: bool,
    pub banned: bool,
    pub roles: String,
}

impl UserRow {
    /// Roles stored either as a single name or as a Postgres array literal.
    pub fn roles(&self) -> Vec<Role> {
        self.roles
            .trim_matches(|c| c == '{' || c == '}')
            .split(',')
            .filter_map(|role| Role::from_str(role.trim().trim_matches('"')).ok())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub verified: bool,
    pub banned: bool,
    pub role: Role,
}

pub struct Users<'a> {
    pool: &'a PgPool,
}

impl<'a> Users<'a> {
    pub(super) fn new(pool: &'a PgPool) -> Users<'a> {
        Users { pool }
    }

    pub async fn create(&self, user: &NewUser) -> Result<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (id, email, full_name, password, created_at, updated_at, verified, banned, roles) \
             VALUES ($1, $2, $3, $4, now(), now(), $5, $6, $7) RETURNING {COLUMNS}"
        ))
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.password)
        .bind(user.verified)
        .bind(user.banned)
        .bind(user.role.to_string())
        .fetch_one(self.pool)
        .await?;
        debug!(id = %row.id, email = %row.email, "inserted user");
        Ok(row)
    }

    pub async fn by_id(&self, id: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    pub async fn by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    pub async fn exists_by_email(&self, email: &str) -> Result<bool> {
        Ok(self.by_email(email).await?.is_some())
    }

    /// Returns `false` when no user has this id.
    pub async fn set_banned(&self, id: &str, banned: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET banned = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(banned)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: &str) -> Result<Cleanup> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(deleted(result.rows_affected(), format_args!("user {id}")))
    }
}
