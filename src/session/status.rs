//! Status Cache Module
//!
//! Memoized aggregate status shown by the server's bot account.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::session::SessionRegistry;

/// Aggregate snapshot of the server's live state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BotStatus {
    pub online_players: usize,
    pub active_matches: usize,
    pub generated_at: DateTime<Utc>,
}

// == Status Cache ==
#[derive(Debug, Default)]
pub struct StatusCache {
    cached: RwLock<Option<BotStatus>>,
}

impl StatusCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoized status, computing it from `registry` on a miss.
    pub async fn get_or_compute(&self, registry: &dyn SessionRegistry, now: DateTime<Utc>) -> BotStatus {
        if let Some(status) = self.cached.read().await.as_ref() {
            return status.clone();
        }

        let status = BotStatus {
            online_players: registry.online_players().await.len(),
            active_matches: registry.matches().await.len(),
            generated_at: now,
        };

        let mut cached = self.cached.write().await;
        cached.get_or_insert(status).clone()
    }

    /// Drops the memoized status. Returns true if one was cached.
    pub async fn clear(&self) -> bool {
        self.cached.write().await.take().is_some()
    }

    pub async fn cached(&self) -> Option<BotStatus> {
        self.cached.read().await.clone()
    }
}
