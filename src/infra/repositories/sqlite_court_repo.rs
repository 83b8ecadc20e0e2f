use crate::domain::{models::court::{Court, CourtFilters, CourtPatch}, ports::CourtRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub struct SqliteCourtRepo { pool: SqlitePool }
impl SqliteCourtRepo { pub fn new(pool: SqlitePool) -> Self { Self { pool } } }

#[async_trait]
impl CourtRepository for SqliteCourtRepo {
    async fn create(&self, court: &Court) -> Result<Court, AppError> {
        sqlx::query_as::<_, Court>(
            "INSERT INTO courts (id, name, location, price_per_hour, max_players, latitude, longitude, image_url, manager_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&court.id).bind(&court.name).bind(&court.location).bind(court.price_per_hour).bind(court.max_players)
            .bind(court.latitude).bind(court.longitude).bind(&court.image_url).bind(&court.manager_id).bind(court.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn query(&self, filters: &CourtFilters) -> Result<Vec<Court>, AppError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM courts WHERE 1 = 1");
        // SQLite's LOWER only folds ASCII, so the text term is matched in Rust.
        if let Some(range) = &filters.price_range {
            qb.push(" AND price_per_hour >= ").push_bind(range.min);
            if let Some(max) = range.max {
                qb.push(" AND price_per_hour <= ").push_bind(max);
            }
        }
        if let Some(capacity) = filters.capacity {
            qb.push(" AND max_players = ").push_bind(capacity);
        }
        qb.push(" ORDER BY name ASC");

        let courts = qb.build_query_as::<Court>().fetch_all(&self.pool).await.map_err(AppError::Database)?;
        Ok(courts.into_iter().filter(|court| filters.matches(court)).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Court>, AppError> {
        sqlx::query_as::<_, Court>("SELECT * FROM courts WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_manager(&self, manager_id: &str) -> Result<Vec<Court>, AppError> {
        sqlx::query_as::<_, Court>("SELECT * FROM courts WHERE manager_id = ? ORDER BY name ASC").bind(manager_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, id: &str, patch: &CourtPatch) -> Result<Court, AppError> {
        sqlx::query_as::<_, Court>(
            "UPDATE courts SET name=?, location=?, price_per_hour=?, max_players=?, image_url=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&patch.name).bind(&patch.location).bind(patch.price_per_hour).bind(patch.max_players).bind(&patch.image_url)
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Quadra não encontrada.".into()))
    }
}
