use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool};
use tracing::*;

use super::deleted;
use crate::{api::Cleanup, models::MovieData, Result};

const COLUMNS: &str = "id, name, price, description, image_url, location::text AS location, \
                       published, rating, genre_id, created_at";

/// Row of the `movies` table. Prices are whole rubles, as on the wire.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MovieRow {
    pub id: i32,
    pub name: String,
    pub price: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub location: Option<String>,
    pub published: bool,
    pub rating: Option<f64>,
    pub genre_id: i32,
    pub created_at: NaiveDateTime,
}

impl MovieRow {
    /// Whether the stored row carries what `data` asked for.
    pub fn matches(&self, data: &MovieData) -> bool {
        self.name == data.name
            && i64::from(self.price) == data.price
            && i64::from(self.genre_id) == data.genre_id
            && self.description.as_deref() == Some(data.description.as_str())
            && data.location.map_or(true, |l| self.location.as_deref() == Some(l.to_string().as_str()))
    }
}

pub struct Movies<'a> {
    pool: &'a PgPool,
}

impl<'a> Movies<'a> {
    pub(super) fn new(pool: &'a PgPool) -> Movies<'a> {
        Movies { pool }
    }

    /// Inserts a movie straight into the table. Unset `published` stores `false`.
    pub async fn create(&self, data: &MovieData) -> Result<MovieRow> {
        let row = sqlx::query_as::<_, MovieRow>(&format!(
            "INSERT INTO movies (name, price, description, image_url, location, published, rating, genre_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now()) RETURNING {COLUMNS}"
        ))
        .bind(&data.name)
        .bind(data.price)
        .bind(&data.description)
        .bind(data.image_url.as_deref())
        .bind(data.location.map(|l| l.to_string()))
        .bind(data.published.unwrap_or(false))
        .bind(data.rating)
        .bind(data.genre_id)
        .fetch_one(self.pool)
        .await?;
        debug!(id = row.id, "inserted movie {}", row.name);
        Ok(row)
    }

    pub async fn by_id(&self, id: i64) -> Result<Option<MovieRow>> {
        let row = sqlx::query_as::<_, MovieRow>(&format!("SELECT {COLUMNS} FROM movies WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    pub async fn by_name(&self, name: &str) -> Result<Option<MovieRow>> {
        let row = sqlx::query_as::<_, MovieRow>(&format!("SELECT {COLUMNS} FROM movies WHERE name = $1"))
            .bind(name)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    pub async fn by_genre(&self, genre_id: i64) -> Result<Vec<MovieRow>> {
        let rows = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {COLUMNS} FROM movies WHERE genre_id = $1 ORDER BY id"
        ))
        .bind(genre_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Movies priced within `min..=max`.
    pub async fn by_price_range(&self, min: i64, max: i64) -> Result<Vec<MovieRow>> {
        let rows = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {COLUMNS} FROM movies WHERE price BETWEEN $1 AND $2 ORDER BY id"
        ))
        .bind(min)
        .bind(max)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn update_price(&self, id: i64, price: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE movies SET price = $2 WHERE id = $1")
            .bind(id)
            .bind(price)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i64) -> Result<Cleanup> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(deleted(result.rows_affected(), format_args!("movie {id}")))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{db::live, models::Location, DataGenerator};
    use pretty_assertions::assert_eq;

    fn row(data: &MovieData) -> MovieRow {
        MovieRow {
            id: 1,
            name: data.name.clone(),
            price: data.price as i32,
            description: Some(data.description.clone()),
            image_url: data.image_url.clone(),
            location: data.location.map(|l| l.to_string()),
            published: true,
            rating: None,
            genre_id: data.genre_id as i32,
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn stored_row_matches_its_request() {
        let data = DataGenerator::seeded(3).movie(4);
        assert!(row(&data).matches(&data));

        let mut moved = row(&data);
        moved.location = Some(if data.location == Some(Location::Msk) { "SPB" } else { "MSK" }.into());
        assert!(!moved.matches(&data));

        let mut repriced = row(&data);
        repriced.price += 1;
        assert!(!repriced.matches(&data));
    }

    #[tokio::test]
    #[ignore = "requires the service database"]
    async fn movie_lifecycle_and_counter() -> eyre::Result<()> {
        let db = live::database().await;
        let mut data = DataGenerator::new();
        let genre = db.genres().create(&data.genre().name).await?;
        let request = data.movie(i64::from(genre.id));
        let before = db.total_movies().await?;

        let movie = db.movies().create(&request).await?;
        let id = i64::from(movie.id);
        assert!(movie.matches(&request));
        assert_eq!(db.total_movies().await?, before + 1);
        assert_eq!(db.movies().by_name(&request.name).await?, Some(movie.clone()));
        assert_eq!(db.movies().by_genre(i64::from(genre.id)).await?, vec![movie.clone()]);
        assert!(db
            .movies()
            .by_price_range(request.price, request.price)
            .await?
            .iter()
            .any(|m| m.id == movie.id));

        assert!(db.movies().update_price(id, request.price + 1).await?);
        assert_eq!(db.movies().by_id(id).await?.map(|m| m.price), Some(movie.price + 1));

        assert_eq!(db.movies().delete(id).await?, Cleanup::Deleted);
        assert_eq!(db.movies().by_id(id).await?, None);
        assert_eq!(db.genres().delete(i64::from(genre.id)).await?, Cleanup::Deleted);
        Ok(())
    }
}
