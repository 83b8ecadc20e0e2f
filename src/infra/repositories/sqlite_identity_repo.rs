use crate::domain::{models::identity::Identity, ports::IdentityRepository};
use crate::error::AppError;
use crate::infra::repositories::is_unique_violation;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteIdentityRepo { pool: SqlitePool }
impl SqliteIdentityRepo { pub fn new(pool: SqlitePool) -> Self { Self { pool } } }

#[async_trait]
impl IdentityRepository for SqliteIdentityRepo {
    async fn create(&self, identity: &Identity) -> Result<Identity, AppError> {
        sqlx::query_as::<_, Identity>(
            "INSERT INTO identities (id, email, password_hash, created_at) VALUES (?, ?, ?, ?) RETURNING *"
        )
            .bind(&identity.id).bind(&identity.email).bind(&identity.password_hash).bind(identity.created_at)
            .fetch_one(&self.pool).await
            .map_err(|e| if is_unique_violation(&e) { AppError::Conflict("E-mail já cadastrado.".into()) } else { AppError::Database(e) })
    }
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AppError> {
        sqlx::query_as::<_, Identity>("SELECT * FROM identities WHERE email = ?").bind(email).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Identity>, AppError> {
        sqlx::query_as::<_, Identity>("SELECT * FROM identities WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM identities WHERE id = ?").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }
}
