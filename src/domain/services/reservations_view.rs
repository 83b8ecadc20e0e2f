use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};

use crate::domain::models::reservation::ReservationSummary;
use crate::domain::ports::BookingRepository;
use crate::domain::services::events::ReservationEvent;
use crate::error::AppError;

const MAX_CACHED_PLAYERS: usize = 1024;

#[derive(Default)]
struct Cache {
    entries: HashMap<String, Arc<Vec<ReservationSummary>>>,
    /// Bumped on every invalidation; a fill started under an older value is discarded.
    generation: u64,
}

/// Per-player cache of "my reservations", refreshed only when a
/// `ReservationsChanged` event names that player.
pub struct ReservationsView {
    repo: Arc<dyn BookingRepository>,
    cache: RwLock<Cache>,
}

impl ReservationsView {
    pub fn new(repo: Arc<dyn BookingRepository>) -> Self {
        Self { repo, cache: RwLock::new(Cache::default()) }
    }

    pub async fn for_player(&self, player_id: &str) -> Result<Arc<Vec<ReservationSummary>>, AppError> {
        let started_at = {
            let cache = self.cache.read().await;
            if let Some(hit) = cache.entries.get(player_id) {
                return Ok(hit.clone());
            }
            cache.generation
        };

        let fresh = Arc::new(self.repo.list_by_player(player_id).await?);

        let mut cache = self.cache.write().await;
        if cache.generation != started_at {
            debug!(player_id, "Reservations changed during load; not caching");
            return Ok(fresh);
        }
        if cache.entries.len() >= MAX_CACHED_PLAYERS {
            cache.entries.clear();
        }
        cache.entries.insert(player_id.to_string(), fresh.clone());
        Ok(fresh)
    }

    pub async fn invalidate(&self, player_id: &str) {
        let mut cache = self.cache.write().await;
        cache.generation += 1;
        if cache.entries.remove(player_id).is_some() {
            debug!(player_id, "Reservations cache invalidated");
        }
    }

    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.generation += 1;
        cache.entries.clear();
    }

    /// Consumes reservation events until the bus is dropped.
    pub async fn listen(self: Arc<Self>, mut rx: broadcast::Receiver<ReservationEvent>) {
        loop {
            match rx.recv().await {
                Ok(ReservationEvent::ReservationsChanged { player_id, .. }) => self.invalidate(&player_id).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Reservation events lagged; dropping whole cache");
                    self.clear().await;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}
