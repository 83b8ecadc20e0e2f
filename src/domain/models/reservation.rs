use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use crate::domain::models::slot::Slot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ReservationStatus::Pending),
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            other => Err(format!("unknown reservation status '{other}'")),
        }
    }
}

impl TryFrom<String> for ReservationStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Reservation {
    pub id: String,
    pub court_id: String,
    pub player_id: String,
    pub booking_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub start_time: Slot,
    pub end_time: String,
    #[sqlx(try_from = "String")]
    pub status: ReservationStatus,
    pub total_price: Option<f64>,
    pub created_at: DateTime<Utc>,
}

pub struct NewReservationParams {
    pub court_id: String,
    pub player_id: String,
    pub booking_date: NaiveDate,
    pub slot: Slot,
    pub status: ReservationStatus,
    pub total_price: Option<f64>,
}

impl Reservation {
    pub fn new(params: NewReservationParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            court_id: params.court_id,
            player_id: params.player_id,
            booking_date: params.booking_date,
            start_time: params.slot,
            end_time: params.slot.end_time(),
            status: params.status,
            total_price: params.total_price,
            created_at: Utc::now(),
        }
    }

    /// `YYYY-MM-DD` taken from the calendar date itself.
    pub fn booking_date_str(&self) -> String {
        self.booking_date.format("%Y-%m-%d").to_string()
    }
}

/// Reservation joined with the court's display name, for the profile and link views.
#[derive(Debug, Serialize, FromRow, Clone)]
pub struct ReservationSummary {
    pub id: String,
    pub court_id: String,
    pub court_name: Option<String>,
    pub booking_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub start_time: Slot,
    pub end_time: String,
    #[sqlx(try_from = "String")]
    pub status: ReservationStatus,
    pub total_price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_reservation_derives_end_time_and_date_string() {
        let r = Reservation::new(NewReservationParams {
            court_id: "c1".into(),
            player_id: "p1".into(),
            booking_date: NaiveDate::from_ymd_opt(2031, 3, 9).unwrap(),
            slot: "9:00".parse().unwrap(),
            status: ReservationStatus::Pending,
            total_price: Some(80.0),
        });
        assert_eq!(r.start_time.start_time(), "09:00");
        assert_eq!(r.end_time, "10:00");
        assert_eq!(r.booking_date_str(), "2031-03-09");
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Confirmed".parse::<ReservationStatus>(), Ok(ReservationStatus::Confirmed));
        assert!("booked".parse::<ReservationStatus>().is_err());
    }
}
