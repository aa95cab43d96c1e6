//! Content store port and its Postgres adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::content::ContentRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(sqlx::Error),

    #[error("content store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    /// Pool exhaustion and broken connections are reported as `Unavailable`
    /// so callers can tell an outage from a bad query.
    fn from(err: sqlx::Error) -> Self {
        match err {
            err @ (sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Sqlx(other),
        }
    }
}

/// Owner-scoped CRUD plus the age-based bulk delete used by the sweep.
/// Every owner-scoped call treats "not yours" exactly like "not there".
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn insert(&self, record: &ContentRecord) -> Result<(), StoreError>;

    async fn find_owned(&self, content_id: Uuid, owner_id: Uuid)
        -> Result<Option<ContentRecord>, StoreError>;

    /// Newest first.
    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContentRecord>, StoreError>;

    async fn count_by_owner(&self, owner_id: Uuid) -> Result<i64, StoreError>;

    async fn delete_owned(&self, content_id: Uuid, owner_id: Uuid) -> Result<bool, StoreError>;

    /// Replaces description and/or audio when given. `None` leaves a column as is.
    async fn update_enhancements(
        &self,
        content_id: Uuid,
        owner_id: Uuid,
        description: Option<&str>,
        audio: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<ContentRecord>, StoreError>;

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;
}

#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn insert(&self, record: &ContentRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO generated_content
                (content_id, owner_id, process_id, title, persona, text, text_short,
                 description, tags, audio, additional_content, prompt_used,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(record.content_id)
        .bind(record.owner_id)
        .bind(&record.process_id)
        .bind(&record.title)
        .bind(&record.persona)
        .bind(&record.text)
        .bind(&record.text_short)
        .bind(&record.description)
        .bind(&record.tags)
        .bind(&record.audio)
        .bind(&record.additional_content)
        .bind(&record.prompt_used)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_owned(
        &self,
        content_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<ContentRecord>, StoreError> {
        let record = sqlx::query_as::<_, ContentRecord>(
            "SELECT * FROM generated_content WHERE content_id = $1 AND owner_id = $2",
        )
        .bind(content_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContentRecord>, StoreError> {
        let records = sqlx::query_as::<_, ContentRecord>(
            r#"
            SELECT * FROM generated_content
            WHERE owner_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn count_by_owner(&self, owner_id: Uuid) -> Result<i64, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM generated_content WHERE owner_id = $1")
                .bind(owner_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn delete_owned(&self, content_id: Uuid, owner_id: Uuid) -> Result<bool, StoreError> {
        let result =
            sqlx::query("DELETE FROM generated_content WHERE content_id = $1 AND owner_id = $2")
                .bind(content_id)
                .bind(owner_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_enhancements(
        &self,
        content_id: Uuid,
        owner_id: Uuid,
        description: Option<&str>,
        audio: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<ContentRecord>, StoreError> {
        let record = sqlx::query_as::<_, ContentRecord>(
            r#"
            UPDATE generated_content
            SET description = COALESCE($3, description),
                audio = COALESCE($4, audio),
                updated_at = $5
            WHERE content_id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(content_id)
        .bind(owner_id)
        .bind(description)
        .bind(audio)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM generated_content WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_map_to_unavailable() {
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolClosed),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn test_query_errors_stay_sqlx() {
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::Sqlx(sqlx::Error::RowNotFound)
        ));
    }
}
