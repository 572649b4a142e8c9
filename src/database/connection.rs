use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn from_url(database_url: &str) -> Result<Self, anyhow::Error> {
        tracing::info!("Opening cart storage at {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)
            .context("Invalid DATABASE_URL")?
            .create_if_missing(true);

        // Every connection to `:memory:` is its own database, so keep exactly one alive.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(4)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("Failed to open cart storage")?;

        tracing::info!("Cart storage opened successfully");
        Ok(Database { pool })
    }

    /// Creates the key-value table if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), anyhow::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS storage (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create storage table")?;

        tracing::debug!("Storage table ready");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<bool, anyhow::Error> {
        let health_check: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Failed to perform health check")?;

        tracing::debug!("Storage health check passed");
        Ok(health_check == 1)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) -> Result<(), anyhow::Error> {
        self.pool.close().await;
        tracing::info!("Cart storage closed successfully");
        Ok(())
    }
}
