use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::domain::models::{
    court::Court,
    profile::Profile,
    reservation::{NewReservationParams, Reservation, ReservationStatus},
    slot::Slot,
};
use crate::domain::ports::{BookingRepository, Clipboard, StoreError};
use crate::domain::services::events::{EventBus, ReservationEvent};
use crate::error::{AppError, Notification};

/// Collaborators a flow needs; cheap to clone per flow instance.
#[derive(Clone)]
pub struct BookingFlowDeps {
    pub booking_repo: Arc<dyn BookingRepository>,
    pub clipboard: Arc<dyn Clipboard>,
    pub events: EventBus,
    pub origin: String,
    pub timezone: Tz,
    pub initial_status: ReservationStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetCourt {
    pub id: String,
    pub name: String,
    pub price_per_hour: f64,
}

impl From<&Court> for TargetCourt {
    fn from(court: &Court) -> Self {
        Self {
            id: court.id.clone(),
            name: court.name.clone(),
            price_per_hour: court.price_per_hour,
        }
    }
}

/// What the user has picked so far. Never persisted directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateReservation {
    pub date: Option<NaiveDate>,
    pub start_time: Option<Slot>,
}

#[derive(Debug, Default)]
struct FlowState {
    court: Option<TargetCourt>,
    candidate: CandidateReservation,
}

#[derive(Debug, Serialize)]
pub struct BookingConfirmation {
    pub reservation: Reservation,
    pub link: String,
    pub copied_to_clipboard: bool,
    pub notification: Notification,
}

pub fn share_link(origin: &str, reservation_id: &str) -> String {
    format!("{}/reserva/{}", origin.trim_end_matches('/'), reservation_id)
}

/// Clears the busy flag when a submission settles, whichever branch it took.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Booking dialog controller: one candidate reservation, at most one in-flight submit.
pub struct BookingFlow {
    deps: BookingFlowDeps,
    profile: Option<Profile>,
    state: Mutex<FlowState>,
    busy: AtomicBool,
}

impl BookingFlow {
    pub fn new(deps: BookingFlowDeps, profile: Option<Profile>) -> Self {
        Self {
            deps,
            profile,
            state: Mutex::new(FlowState::default()),
            busy: AtomicBool::new(false),
        }
    }

    fn state(&self) -> MutexGuard<'_, FlowState> {
        // The state is plain data; a panic elsewhere cannot leave it half-written.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn open(&self, court: TargetCourt) {
        let mut state = self.state();
        state.court = Some(court);
        state.candidate = CandidateReservation::default();
    }

    pub fn select_date(&self, date: NaiveDate) {
        self.state().candidate.date = Some(date);
    }

    pub fn select_start_time(&self, slot: Slot) {
        self.state().candidate.start_time = Some(slot);
    }

    pub fn cancel(&self) {
        let mut state = self.state();
        state.court = None;
        state.candidate = CandidateReservation::default();
    }

    pub fn is_open(&self) -> bool {
        self.state().court.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn candidate(&self) -> CandidateReservation {
        self.state().candidate.clone()
    }

    pub fn court(&self) -> Option<TargetCourt> {
        self.state().court.clone()
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.deps.timezone).date_naive()
    }

    pub async fn submit(&self) -> Result<BookingConfirmation, AppError> {
        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            warn!("Booking submit ignored: another submission is in flight");
            return Err(AppError::SubmissionInProgress);
        };

        let profile = self.profile.as_ref().ok_or(AppError::AuthRequired)?;

        let (court, candidate) = {
            let state = self.state();
            (state.court.clone(), state.candidate.clone())
        };

        let (Some(date), Some(slot)) = (candidate.date, candidate.start_time) else {
            return Err(AppError::IncompleteSelection);
        };

        let court = court.ok_or_else(|| AppError::InvalidSelection("Nenhuma quadra selecionada".into()))?;

        if date < self.today() {
            return Err(AppError::InvalidSelection("Não é possível reservar uma data passada".into()));
        }

        let reservation = Reservation::new(NewReservationParams {
            court_id: court.id.clone(),
            player_id: profile.id.clone(),
            booking_date: date,
            slot,
            status: self.deps.initial_status,
            total_price: Some(court.price_per_hour),
        });

        info!(
            court_id = %court.id,
            player_id = %profile.id,
            date = %reservation.booking_date_str(),
            start_time = %slot,
            "Submitting reservation"
        );

        let created = match self.deps.booking_repo.insert(&reservation).await {
            Ok(created) => created,
            Err(StoreError::Conflict) => {
                warn!(court_id = %court.id, date = %date, start_time = %slot, "Slot already booked");
                return Err(AppError::SlotConflict);
            }
            Err(StoreError::Other(message)) => {
                error!(court_id = %court.id, "Reservation insert failed: {}", message);
                return Err(AppError::SubmissionFailed(message));
            }
        };

        let link = share_link(&self.deps.origin, &created.id);
        let copied_to_clipboard = match self.deps.clipboard.copy(&link) {
            Ok(()) => true,
            Err(e) => {
                info!("Clipboard unavailable ({}); returning link as text", e);
                false
            }
        };

        self.deps.events.publish_reservation(ReservationEvent::ReservationsChanged {
            player_id: created.player_id.clone(),
            court_id: created.court_id.clone(),
            reservation_id: created.id.clone(),
        });

        self.cancel();
        info!(reservation_id = %created.id, "Reservation created for court {}", court.name);

        let description = if copied_to_clipboard {
            "Link de convite copiado para a área de transferência".to_string()
        } else {
            format!("Compartilhe o link de convite: {link}")
        };

        Ok(BookingConfirmation {
            reservation: created,
            link,
            copied_to_clipboard,
            notification: Notification {
                title: "Reserva confirmada!".to_string(),
                description,
            },
        })
    }
}
