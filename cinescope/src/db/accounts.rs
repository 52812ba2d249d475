use sqlx::{FromRow, PgPool};
use tracing::*;

use super::deleted;
use crate::{api::Cleanup, Error, Result};

/// Row of `accounts_transaction_template`, a scratch table for transfer tests.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AccountRow {
    pub user: String,
    pub balance: i32,
}

pub struct Accounts<'a> {
    pool: &'a PgPool,
}

impl<'a> Accounts<'a> {
    pub(super) fn new(pool: &'a PgPool) -> Accounts<'a> {
        Accounts { pool }
    }

    pub async fn create(&self, user: &str, balance: i32) -> Result<AccountRow> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"INSERT INTO accounts_transaction_template ("user", balance) VALUES ($1, $2) RETURNING "user", balance"#,
        )
        .bind(user)
        .bind(balance)
        .fetch_one(self.pool)
        .await?;
        debug!(user, balance, "inserted account");
        Ok(row)
    }

    pub async fn by_user(&self, user: &str) -> Result<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"SELECT "user", balance FROM accounts_transaction_template WHERE "user" = $1"#,
        )
        .bind(user)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    pub async fn all(&self) -> Result<Vec<AccountRow>> {
        let rows = sqlx::query_as::<_, AccountRow>(
            r#"SELECT "user", balance FROM accounts_transaction_template ORDER BY "user""#,
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Fails with [`Error::AccountNotFound`] when `user` has no account.
    pub async fn update_balance(&self, user: &str, balance: i32) -> Result<()> {
        let result = sqlx::query(r#"UPDATE accounts_transaction_template SET balance = $2 WHERE "user" = $1"#)
            .bind(user)
            .bind(balance)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::AccountNotFound(user.to_string()));
        }
        Ok(())
    }

    /// Moves `amount` between two accounts in one transaction. Both rows are
    /// locked first, and nothing changes when the sender lacks the funds.
    pub async fn transfer(&self, from: &str, to: &str, amount: i32) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let balances: Vec<AccountRow> = sqlx::query_as(
            r#"SELECT "user", balance FROM accounts_transaction_template
               WHERE "user" = $1 OR "user" = $2 ORDER BY "user" FOR UPDATE"#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&mut *tx)
        .await?;

        let balance_of = |user: &str| {
            balances
                .iter()
                .find(|row| row.user == user)
                .map(|row| row.balance)
                .ok_or_else(|| Error::AccountNotFound(user.to_string()))
        };
        let available = balance_of(from)?;
        balance_of(to)?;
        if available < amount {
            return Err(Error::InsufficientBalance {
                user: from.to_string(),
                balance: available,
                amount,
            });
        }

        let sql = r#"UPDATE accounts_transaction_template SET balance = balance + $2 WHERE "user" = $1"#;
        sqlx::query(sql).bind(from).bind(-amount).execute(&mut *tx).await?;
        sqlx::query(sql).bind(to).bind(amount).execute(&mut *tx).await?;
        tx.commit().await?;
        debug!(from, to, amount, "transferred");
        Ok(())
    }

    pub async fn delete(&self, user: &str) -> Result<Cleanup> {
        let result = sqlx::query(r#"DELETE FROM accounts_transaction_template WHERE "user" = $1"#)
            .bind(user)
            .execute(self.pool)
            .await?;
        Ok(deleted(result.rows_affected(), format_args!("account {user}")))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{db::live, DataGenerator};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    #[ignore = "requires the service database"]
    async fn transfer_moves_funds_or_nothing() -> eyre::Result<()> {
        let db = live::database().await;
        let mut data = DataGenerator::new();
        let stan = format!("Stan_{}", data.uuid());
        let bob = format!("Bob_{}", data.uuid());
        db.accounts().create(&stan, 1000).await?;
        db.accounts().create(&bob, 500).await?;

        db.accounts().transfer(&stan, &bob, 200).await?;
        assert_eq!(db.accounts().by_user(&stan).await?.map(|a| a.balance), Some(800));
        assert_eq!(db.accounts().by_user(&bob).await?.map(|a| a.balance), Some(700));

        let err = db.accounts().transfer(&stan, &bob, 1000).await.unwrap_err();
        assert!(matches!(err, Error::InsufficientBalance { balance: 800, .. }), "{err}");
        assert_eq!(db.accounts().by_user(&bob).await?.map(|a| a.balance), Some(700));

        db.accounts().update_balance(&bob, 0).await?;
        assert_eq!(db.accounts().by_user(&bob).await?.map(|a| a.balance), Some(0));

        assert_eq!(db.accounts().delete(&stan).await?, Cleanup::Deleted);
        assert_eq!(db.accounts().delete(&bob).await?, Cleanup::Deleted);
        assert!(matches!(
            db.accounts().update_balance(&bob, 1).await,
            Err(Error::AccountNotFound(_))
        ));
        assert_eq!(db.accounts().by_user(&stan).await?, None);
        Ok(())
    }
}
