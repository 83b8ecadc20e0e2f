use std::sync::Arc;
use crate::domain::models::profile::Profile;
use crate::domain::ports::{
    AuthRepository, BookingRepository, Clipboard, CourtRepository, IdentityRepository, ProfileRepository,
};
use crate::domain::services::{
    auth_service::AuthService,
    booking_flow::{BookingFlow, BookingFlowDeps},
    events::EventBus,
    reservations_view::ReservationsView,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub identity_repo: Arc<dyn IdentityRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub court_repo: Arc<dyn CourtRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub clipboard: Arc<dyn Clipboard>,
    pub auth_service: Arc<AuthService>,
    pub events: EventBus,
    pub reservations_view: Arc<ReservationsView>,
}

impl AppState {
    /// A fresh booking flow acting as `profile` (or as a guest).
    pub fn booking_flow(&self, profile: Option<Profile>) -> BookingFlow {
        let deps = BookingFlowDeps {
            booking_repo: self.booking_repo.clone(),
            clipboard: self.clipboard.clone(),
            events: self.events.clone(),
            origin: self.config.app_origin.clone(),
            timezone: self.config.timezone,
            initial_status: self.config.initial_reservation_status,
        };
        BookingFlow::new(deps, profile)
    }
}
