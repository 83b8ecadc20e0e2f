use std::env;
use chrono_tz::Tz;
use thiserror::Error;
use crate::domain::models::reservation::ReservationStatus;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Key every `/api` caller presents in the `apikey` header.
    pub public_api_key: String,
    pub map_access_token: String,
    pub app_origin: String,
    pub jwt_secret_key: String, // Ed25519 private key (PEM)
    pub jwt_public_key: String, // Ed25519 public key (PEM)
    pub auth_issuer: String,
    pub timezone: Tz,
    pub initial_reservation_status: ReservationStatus,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_raw = optional("PORT", "3000");
        let port = port_raw.parse().map_err(|_| ConfigError::Invalid { name: "PORT", value: port_raw.clone() })?;

        let tz_raw = optional("APP_TIMEZONE", "America/Sao_Paulo");
        let timezone = tz_raw.parse::<Tz>().map_err(|_| ConfigError::Invalid { name: "APP_TIMEZONE", value: tz_raw.clone() })?;

        let status_raw = optional("RESERVATION_INITIAL_STATUS", "pending");
        let initial_reservation_status = match status_raw.parse::<ReservationStatus>() {
            Ok(ReservationStatus::Cancelled) | Err(_) => {
                return Err(ConfigError::Invalid { name: "RESERVATION_INITIAL_STATUS", value: status_raw });
            }
            Ok(status) => status,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port,
            public_api_key: required("PUBLIC_API_KEY")?,
            map_access_token: required("MAP_ACCESS_TOKEN")?,
            app_origin: optional("APP_ORIGIN", "http://localhost:5173").trim_end_matches('/').to_string(),
            jwt_secret_key: required("JWT_SECRET_KEY")?,
            jwt_public_key: required("JWT_PUBLIC_KEY")?,
            auth_issuer: optional("AUTH_ISSUER", "https://api.futcerto.local"),
            timezone,
            initial_reservation_status,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn optional(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}
