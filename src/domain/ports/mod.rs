use crate::domain::models::{
    court::{Court, CourtFilters, CourtPatch},
    identity::{Identity, RefreshTokenRecord},
    profile::Profile,
    reservation::{Reservation, ReservationSummary},
};
use crate::error::AppError;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Outcome of a reservation insert, decoded once by the storage adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("uniqueness violated")]
    Conflict,
    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait IdentityRepository: Send + Sync {
    async fn create(&self, identity: &Identity) -> Result<Identity, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Identity>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    /// Removes and returns the token in one statement, so a refresh token is spent at most once.
    async fn take_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn insert(&self, profile: &Profile) -> Result<Profile, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Profile>, AppError>;
}

#[async_trait]
pub trait CourtRepository: Send + Sync {
    async fn create(&self, court: &Court) -> Result<Court, AppError>;
    /// Matching courts ordered by name ascending.
    async fn query(&self, filters: &CourtFilters) -> Result<Vec<Court>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Court>, AppError>;
    async fn list_by_manager(&self, manager_id: &str) -> Result<Vec<Court>, AppError>;
    async fn update(&self, id: &str, patch: &CourtPatch) -> Result<Court, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, reservation: &Reservation) -> Result<Reservation, StoreError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<ReservationSummary>, AppError>;
    /// Newest first: booking date, then start time, both descending.
    async fn list_by_player(&self, player_id: &str) -> Result<Vec<ReservationSummary>, AppError>;
}

/// Best-effort copy of a shareable link to wherever the caller can paste it from.
pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str) -> Result<(), String>;
}
