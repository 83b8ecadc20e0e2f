use crate::domain::{models::identity::Identity, ports::IdentityRepository};
use crate::error::AppError;
use crate::infra::repositories::is_unique_violation;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresIdentityRepo {
    pool: PgPool,
}

impl PostgresIdentityRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepo {
    async fn create(&self, identity: &Identity) -> Result<Identity, AppError> {
        sqlx::query_as::<_, Identity>(
            "INSERT INTO identities (id, email, password_hash, created_at) VALUES ($1, $2, $3, $4) RETURNING id, email, password_hash, created_at",
        )
            .bind(&identity.id)
            .bind(&identity.email)
            .bind(&identity.password_hash)
            .bind(identity.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict("E-mail já cadastrado.".into())
                } else {
                    AppError::Database(e)
                }
            })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AppError> {
        sqlx::query_as::<_, Identity>(
            "SELECT id, email, password_hash, created_at FROM identities WHERE email = $1",
        )
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Identity>, AppError> {
        sqlx::query_as::<_, Identity>(
            "SELECT id, email, password_hash, created_at FROM identities WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM identities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
