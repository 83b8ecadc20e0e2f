pub mod auth;
pub mod booking;
pub mod config;
pub mod court;
pub mod health;
pub mod manager;
pub mod profile;
