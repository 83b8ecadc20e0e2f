use crate::domain::models::{court::CourtPatch, profile::UserType};
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    #[serde(default = "default_user_type")]
    pub user_type: UserType,
}

fn default_user_type() -> UserType {
    UserType::Player
}

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Default)]
pub struct CourtsQuery {
    pub search: Option<String>,
    pub price: Option<String>,
    pub capacity: Option<String>,
}

/// Both fields are optional on the wire so a partial selection reaches the flow
/// and is reported as an incomplete selection rather than a parse error.
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateCourtRequest {
    #[serde(flatten)]
    pub details: CourtPatch,
    pub latitude: f64,
    pub longitude: f64,
}

pub type UpdateCourtRequest = CourtPatch;
