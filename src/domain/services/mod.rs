pub mod auth_service;
pub mod booking_flow;
pub mod court_access;
pub mod events;
pub mod reservations_view;
