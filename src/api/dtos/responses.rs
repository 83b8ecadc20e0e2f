use crate::domain::models::{
    court::Court,
    identity::SessionUser,
    profile::Profile,
    reservation::ReservationSummary,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
pub struct PublicConfigResponse {
    pub map_access_token: String,
    pub app_origin: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub user: SessionUser,
    pub expires_at: DateTime<Utc>,
    pub profile: Option<Profile>,
}

#[derive(Serialize)]
pub struct CourtsResponse {
    pub courts: Vec<Court>,
}

#[derive(Serialize)]
pub struct ReservationsResponse {
    pub reservations: Vec<ReservationSummary>,
}
