use crate::domain::{models::identity::RefreshTokenRecord, ports::AuthRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Refresh sessions: one row per live token, grouped by the sign-in that started the chain.
pub struct SqliteAuthRepo { pool: SqlitePool }
impl SqliteAuthRepo { pub fn new(pool: SqlitePool) -> Self { Self { pool } } }

#[async_trait]
impl AuthRepository for SqliteAuthRepo {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError> {
        sqlx::query("INSERT INTO refresh_tokens (token_hash, identity_id, family_id, expires_at, created_at) VALUES (?, ?, ?, ?, ?)")
            .bind(&record.token_hash).bind(&record.identity_id).bind(record.family_id).bind(record.expires_at).bind(record.created_at)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn take_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError> {
        sqlx::query_as::<_, RefreshTokenRecord>("DELETE FROM refresh_tokens WHERE token_hash = ? RETURNING *")
            .bind(token_hash).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError> {
        let removed = sqlx::query("DELETE FROM refresh_tokens WHERE family_id = ?")
            .bind(family_id).execute(&self.pool).await.map_err(AppError::Database)?;
        tracing::debug!(%family_id, removed = removed.rows_affected(), "Refresh family revoked");
        Ok(())
    }
}
