use chrono::NaiveDateTime;
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::*;

use super::deleted;
use crate::{api::Cleanup, models::PaymentStatus, Result};

const COLUMNS: &str = "id, user_id, movie_id, status::text AS status, amount, total, created_at";

/// Row of the `payments` table. `status` is the text of the `"Status"` enum.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PaymentRow {
    pub id: i32,
    pub user_id: String,
    pub movie_id: i32,
    pub status: String,
    pub amount: i32,
    pub total: i32,
    pub created_at: NaiveDateTime,
}

impl PaymentRow {
    pub fn status(&self) -> PaymentStatus {
        serde_json::from_value(Value::String(self.status.clone())).unwrap_or(PaymentStatus::Other)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub user_id: String,
    pub movie_id: i64,
    pub status: PaymentStatus,
    /// Tickets bought.
    pub amount: i32,
    pub total: i32,
}

fn status_name(status: PaymentStatus) -> String {
    match serde_json::to_value(status) {
        Ok(Value::String(name)) => name,
        _ => format!("{status:?}"),
    }
}

pub struct Payments<'a> {
    pool: &'a PgPool,
}

impl<'a> Payments<'a> {
    pub(super) fn new(pool: &'a PgPool) -> Payments<'a> {
        Payments { pool }
    }

    pub async fn create(&self, payment: &NewPayment) -> Result<PaymentRow> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "INSERT INTO payments (user_id, movie_id, status, amount, total, created_at) \
             VALUES ($1, $2, $3::\"Status\", $4, $5, now()) RETURNING {COLUMNS}"
        ))
        .bind(&payment.user_id)
        .bind(payment.movie_id)
        .bind(status_name(payment.status))
        .bind(payment.amount)
        .bind(payment.total)
        .fetch_one(self.pool)
        .await?;
        debug!(id = row.id, status = %row.status, "inserted payment");
        Ok(row)
    }

    pub async fn by_id(&self, id: i64) -> Result<Option<PaymentRow>> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!("SELECT {COLUMNS} FROM payments WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    pub async fn by_user(&self, user_id: &str) -> Result<Vec<PaymentRow>> {
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {COLUMNS} FROM payments WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn update_status(&self, id: i64, status: PaymentStatus) -> Result<bool> {
        let result = sqlx::query("UPDATE payments SET status = $2::\"Status\" WHERE id = $1")
            .bind(id)
            .bind(status_name(status))
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i64) -> Result<Cleanup> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(deleted(result.rows_affected(), format_args!("payment {id}")))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{db::live, DataGenerator};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(PaymentStatus::Success, "SUCCESS")]
    #[test_case(PaymentStatus::InvalidCard, "INVALID_CARD")]
    #[test_case(PaymentStatus::Error, "ERROR")]
    fn status_names_match_the_database_enum(status: PaymentStatus, name: &str) {
        assert_eq!(status_name(status), name);
        let row = PaymentRow {
            id: 1,
            user_id: "u-1".into(),
            movie_id: 2,
            status: name.into(),
            amount: 1,
            total: 100,
            created_at: NaiveDateTime::default(),
        };
        assert_eq!(row.status(), status);
    }

    #[tokio::test]
    #[ignore = "requires the service database"]
    async fn payment_lifecycle() -> eyre::Result<()> {
        let db = live::database().await;
        let mut data = DataGenerator::new();
        let genre = db.genres().create(&data.genre().name).await?;
        let movie = db.movies().create(&data.movie(i64::from(genre.id))).await?;
        let new = NewPayment {
            user_id: data.uuid(),
            movie_id: i64::from(movie.id),
            status: PaymentStatus::Success,
            amount: 2,
            total: movie.price * 2,
        };

        let payment = db.payments().create(&new).await?;
        let id = i64::from(payment.id);
        assert_eq!(payment.status(), PaymentStatus::Success);
        assert_eq!(db.payments().by_id(id).await?, Some(payment.clone()));
        assert_eq!(db.payments().by_user(&new.user_id).await?, vec![payment]);

        assert!(db.payments().update_status(id, PaymentStatus::InvalidCard).await?);
        assert_eq!(
            db.payments().by_id(id).await?.map(|p| p.status()),
            Some(PaymentStatus::InvalidCard)
        );

        assert_eq!(db.payments().delete(id).await?, Cleanup::Deleted);
        assert_eq!(db.payments().by_id(id).await?, None);
        db.movies().delete(i64::from(movie.id)).await?;
        db.genres().delete(i64::from(genre.id)).await?;
        Ok(())
    }
}
