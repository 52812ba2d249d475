use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool};
use tracing::*;

use super::deleted;
use crate::{api::Cleanup, models::ReviewRequest, Result};

const COLUMNS: &str = "movie_id, user_id, hidden, text, rating, created_at";

/// Row of the `reviews` table, keyed by movie and author.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ReviewRow {
    pub movie_id: i32,
    pub user_id: String,
    pub hidden: bool,
    pub text: String,
    pub rating: i32,
    pub created_at: NaiveDateTime,
}

pub struct Reviews<'a> {
    pool: &'a PgPool,
}

impl<'a> Reviews<'a> {
    pub(super) fn new(pool: &'a PgPool) -> Reviews<'a> {
        Reviews { pool }
    }

    pub async fn create(&self, movie_id: i64, user_id: &str, review: &ReviewRequest) -> Result<ReviewRow> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "INSERT INTO reviews (movie_id, user_id, hidden, text, rating, created_at) \
             VALUES ($1, $2, false, $3, $4, now()) RETURNING {COLUMNS}"
        ))
        .bind(movie_id)
        .bind(user_id)
        .bind(&review.text)
        .bind(i32::from(review.rating))
        .fetch_one(self.pool)
        .await?;
        debug!(movie_id, user_id, "inserted review");
        Ok(row)
    }

    pub async fn by_ids(&self, movie_id: i64, user_id: &str) -> Result<Option<ReviewRow>> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {COLUMNS} FROM reviews WHERE movie_id = $1 AND user_id = $2"
        ))
        .bind(movie_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Every review of the movie, hidden ones included.
    pub async fn by_movie(&self, movie_id: i64) -> Result<Vec<ReviewRow>> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {COLUMNS} FROM reviews WHERE movie_id = $1 ORDER BY created_at"
        ))
        .bind(movie_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn update_rating(&self, movie_id: i64, user_id: &str, rating: i32) -> Result<bool> {
        let result = sqlx::query("UPDATE reviews SET rating = $3 WHERE movie_id = $1 AND user_id = $2")
            .bind(movie_id)
            .bind(user_id)
            .bind(rating)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn update_text(&self, movie_id: i64, user_id: &str, text: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE reviews SET text = $3 WHERE movie_id = $1 AND user_id = $2")
            .bind(movie_id)
            .bind(user_id)
            .bind(text)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hides or shows the review, the database side of `/hide` and `/show`.
    pub async fn set_hidden(&self, movie_id: i64, user_id: &str, hidden: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE reviews SET hidden = $3 WHERE movie_id = $1 AND user_id = $2")
            .bind(movie_id)
            .bind(user_id)
            .bind(hidden)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, movie_id: i64, user_id: &str) -> Result<Cleanup> {
        let result = sqlx::query("DELETE FROM reviews WHERE movie_id = $1 AND user_id = $2")
            .bind(movie_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(deleted(
            result.rows_affected(),
            format_args!("review of movie {movie_id} by {user_id}"),
        ))
    }
}
