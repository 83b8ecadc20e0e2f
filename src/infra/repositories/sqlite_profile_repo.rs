use crate::domain::{models::profile::Profile, ports::ProfileRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteProfileRepo { pool: SqlitePool }
impl SqliteProfileRepo { pub fn new(pool: SqlitePool) -> Self { Self { pool } } }

#[async_trait]
impl ProfileRepository for SqliteProfileRepo {
    async fn insert(&self, profile: &Profile) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>(
            "INSERT INTO profiles (id, name, email, phone, user_type) VALUES (?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&profile.id).bind(&profile.name).bind(&profile.email).bind(&profile.phone).bind(profile.user_type.as_str())
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Profile>, AppError> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
