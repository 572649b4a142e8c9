use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// One key-value entry.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct StoredItem {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Persistent key-value storage, shaped like browser local storage.
#[async_trait]
pub trait StorageRepository: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<StoredItem>, StorageRepositoryError>;
    async fn set_item(&self, key: &str, value: &str) -> Result<StoredItem, StorageRepositoryError>;
    async fn remove_item(&self, key: &str) -> Result<bool, StorageRepositoryError>;
}

/// SQLite implementation of StorageRepository
pub struct SqliteStorageRepository {
    pool: SqlitePool,
}

impl SqliteStorageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageRepository for SqliteStorageRepository {
    async fn get_item(&self, key: &str) -> Result<Option<StoredItem>, StorageRepositoryError> {
        let query = r#"
            SELECT key, value, updated_at FROM storage WHERE key = ?1
        "#;
        let item = sqlx::query_as::<_, StoredItem>(query)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageRepositoryError::DatabaseError)?;

        Ok(item)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<StoredItem, StorageRepositoryError> {
        let query = r#"
            INSERT INTO storage (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            RETURNING key, value, updated_at
        "#;

        let stored = sqlx::query_as::<_, StoredItem>(query)
            .bind(key)
            .bind(value)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageRepositoryError::DatabaseError)?;

        Ok(stored)
    }

    async fn remove_item(&self, key: &str) -> Result<bool, StorageRepositoryError> {
        let result = sqlx::query("DELETE FROM storage WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(StorageRepositoryError::DatabaseError)?;

        Ok(result.rows_affected() > 0)
    }
}
