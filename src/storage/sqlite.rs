use std::str::FromStr as _;

use tracing::error;

use super::{Error, LocalStorage};

/// On-device storage backed by a single SQLite table.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: sqlx::SqlitePool,
}

impl SqliteStorage {
    pub async fn open(url: &str) -> Result<Self, Error> {
        let options = sqlx::sqlite::SqliteConnectOptions::from_str(url)
            .inspect_err(|error| error!(%error, %url, "Failed to open local storage db"))?
            .create_if_missing(true);
        let pool = sqlx::pool::PoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .inspect_err(|error| error!(%error, %url, "Failed to open local storage db"))?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS local_storage(
                key TEXT NOT NULL PRIMARY KEY,
                value TEXT NOT NULL
            );
        "#,
        )
        .execute(&pool)
        .await
        .inspect_err(|error| error!(%error, %url, "Failed to execute DDL to storage db"))?;
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl LocalStorage for SqliteStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        if self.pool.is_closed() {
            return Err(Error::Closed);
        }
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM local_storage WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), Error> {
        if self.pool.is_closed() {
            return Err(Error::Closed);
        }
        sqlx::query(
            r#"
            INSERT INTO local_storage(key, value)
            VALUES (?, ?)
            ON CONFLICT(key)
            DO UPDATE SET
                value = EXCLUDED.value
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), Error> {
        if self.pool.is_closed() {
            return Err(Error::Closed);
        }
        sqlx::query("DELETE FROM local_storage WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
