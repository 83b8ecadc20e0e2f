use crate::domain::{models::reservation::{Reservation, ReservationSummary}, ports::{BookingRepository, StoreError}};
use crate::error::AppError;
use crate::infra::repositories::decode_store_error;
use async_trait::async_trait;
use sqlx::SqlitePool;

const SUMMARY_SELECT: &str = "SELECT r.id, r.court_id, c.name AS court_name, r.booking_date, r.start_time, r.end_time, r.status, r.total_price
     FROM reservations r LEFT JOIN courts c ON c.id = r.court_id";

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn insert(&self, reservation: &Reservation) -> Result<Reservation, StoreError> {
        sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations (id, court_id, player_id, booking_date, start_time, end_time, status, total_price, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&reservation.id).bind(&reservation.court_id).bind(&reservation.player_id)
            .bind(reservation.booking_date).bind(reservation.start_time.start_time()).bind(&reservation.end_time)
            .bind(reservation.status.as_str()).bind(reservation.total_price).bind(reservation.created_at)
            .fetch_one(&self.pool).await.map_err(decode_store_error)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ReservationSummary>, AppError> {
        sqlx::query_as::<_, ReservationSummary>(&format!("{SUMMARY_SELECT} WHERE r.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_player(&self, player_id: &str) -> Result<Vec<ReservationSummary>, AppError> {
        sqlx::query_as::<_, ReservationSummary>(&format!("{SUMMARY_SELECT} WHERE r.player_id = ? ORDER BY r.booking_date DESC, r.start_time DESC"))
            .bind(player_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
