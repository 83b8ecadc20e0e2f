use tokio::sync::broadcast;
use crate::domain::models::identity::SessionUser;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SignedUp(SessionUser),
    SignedIn(SessionUser),
    Refreshed(SessionUser),
    SignedOut { identity_id: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationEvent {
    ReservationsChanged {
        player_id: String,
        court_id: String,
        reservation_id: String,
    },
}

/// Explicit fan-out of session and reservation changes to whoever subscribes.
#[derive(Clone)]
pub struct EventBus {
    sessions: broadcast::Sender<SessionEvent>,
    reservations: broadcast::Sender<ReservationEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sessions, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (reservations, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sessions, reservations }
    }

    pub fn subscribe_sessions(&self) -> broadcast::Receiver<SessionEvent> {
        self.sessions.subscribe()
    }

    pub fn subscribe_reservations(&self) -> broadcast::Receiver<ReservationEvent> {
        self.reservations.subscribe()
    }

    // A send with no live receivers is not an error for us.
    pub fn publish_session(&self, event: SessionEvent) {
        let _ = self.sessions.send(event);
    }

    pub fn publish_reservation(&self, event: ReservationEvent) {
        let _ = self.reservations.send(event);
    }
}
