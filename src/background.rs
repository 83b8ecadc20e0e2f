use std::sync::Arc;
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tokio::task::JoinHandle;
use tracing::{info, info_span, warn, Instrument};
use crate::state::AppState;
use crate::domain::services::events::SessionEvent;

/// Spawns the subscribers that react to session and reservation changes.
pub fn start_event_listeners(state: Arc<AppState>) -> Vec<JoinHandle<()>> {
    info!("Starting event listeners...");

    let view = state.reservations_view.clone();
    let reservations = tokio::spawn(
        view.listen(state.events.subscribe_reservations())
            .instrument(info_span!("reservations_listener")),
    );

    let sessions = tokio::spawn(
        log_session_changes(state.auth_service.subscribe())
            .instrument(info_span!("session_listener")),
    );

    vec![reservations, sessions]
}

async fn log_session_changes(mut rx: Receiver<SessionEvent>) {
    loop {
        match rx.recv().await {
            Ok(SessionEvent::SignedUp(user)) => info!(identity_id = %user.id, "Session started (sign-up)"),
            Ok(SessionEvent::SignedIn(user)) => info!(identity_id = %user.id, "Session started"),
            Ok(SessionEvent::Refreshed(user)) => info!(identity_id = %user.id, "Session refreshed"),
            Ok(SessionEvent::SignedOut { identity_id }) => info!(identity_id = ?identity_id, "Session ended"),
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "Session events lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}
