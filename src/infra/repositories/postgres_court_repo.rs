use crate::domain::{models::court::{Court, CourtFilters, CourtPatch}, ports::CourtRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

const COURT_COLUMNS: &str = "id, name, location, price_per_hour, max_players, latitude, longitude, image_url, manager_id, created_at";

pub struct PostgresCourtRepo {
    pool: PgPool,
}

impl PostgresCourtRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourtRepository for PostgresCourtRepo {
    async fn create(&self, court: &Court) -> Result<Court, AppError> {
        sqlx::query_as::<_, Court>(&format!(
            "INSERT INTO courts ({COURT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {COURT_COLUMNS}"
        ))
            .bind(&court.id)
            .bind(&court.name)
            .bind(&court.location)
            .bind(court.price_per_hour)
            .bind(court.max_players)
            .bind(court.latitude)
            .bind(court.longitude)
            .bind(&court.image_url)
            .bind(&court.manager_id)
            .bind(court.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn query(&self, filters: &CourtFilters) -> Result<Vec<Court>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!("SELECT {COURT_COLUMNS} FROM courts WHERE TRUE"));

        // Numeric bounds narrow in SQL; text search is matched in Rust so case
        // folding is the same on every backend.
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

        let courts = qb.build_query_as::<Court>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(courts.into_iter().filter(|court| filters.matches(court)).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Court>, AppError> {
        sqlx::query_as::<_, Court>(&format!("SELECT {COURT_COLUMNS} FROM courts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_manager(&self, manager_id: &str) -> Result<Vec<Court>, AppError> {
        sqlx::query_as::<_, Court>(&format!("SELECT {COURT_COLUMNS} FROM courts WHERE manager_id = $1 ORDER BY name ASC"))
            .bind(manager_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, id: &str, patch: &CourtPatch) -> Result<Court, AppError> {
        sqlx::query_as::<_, Court>(&format!(
            "UPDATE courts SET name = $1, location = $2, price_per_hour = $3, max_players = $4, image_url = $5
             WHERE id = $6
             RETURNING {COURT_COLUMNS}"
        ))
            .bind(&patch.name)
            .bind(&patch.location)
            .bind(patch.price_per_hour)
            .bind(patch.max_players)
            .bind(&patch.image_url)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Quadra não encontrada.".into()))
    }
}
