//! Ghost Eviction
//!
//! Disconnects sessions whose client stopped sending keep-alives.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tracing::info;

use crate::clock::Clock;
use crate::error::Result;
use crate::session::SessionRegistry;
use crate::tasks::{PeriodicTask, Services};

pub struct GhostEviction {
    registry: Arc<dyn SessionRegistry>,
    clock: Arc<dyn Clock>,
    /// Sessions silent for longer than this are logged out
    threshold: Duration,
}

impl GhostEviction {
    pub fn new(services: &Services, threshold: Duration) -> Self {
        Self {
            registry: services.registry.clone(),
            clock: services.clock.clone(),
            threshold,
        }
    }
}

#[async_trait]
impl PeriodicTask for GhostEviction {
    fn name(&self) -> &'static str {
        "ghost-eviction"
    }

    async fn tick(&self) -> Result<usize> {
        let now = self.clock.now();
        let mut evicted = 0;

        for handle in self.registry.online_players().await {
            let (id, label, idle) = {
                let player = handle.read().await;
                (player.id, player.to_string(), player.idle_for(now))
            };

            if idle > self.threshold && self.registry.logout(id).await {
                info!("Auto-dced {}.", label);
                evicted += 1;
            }
        }

        Ok(evicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::clock::ManualClock;
    use crate::session::{InMemoryRegistry, Player, Privileges, StatusCache};
    use crate::store::InMemoryStore;

    #[tokio::test]
    async fn test_only_silent_sessions_are_evicted() {
        let now = Utc::now();
        let store = Arc::new(InMemoryStore::new());
        let registry = Arc::new(InMemoryRegistry::new(store.clone()));
        let services = Services {
            store,
            registry: registry.clone(),
            status: Arc::new(StatusCache::new()),
            clock: Arc::new(ManualClock::new(now)),
        };
        let eviction = GhostEviction::new(&services, Duration::seconds(300));

        let ghost = registry
            .add_player(Player::connected(
                1,
                "ghost",
                Privileges::NORMAL,
                now - Duration::seconds(301),
            ))
            .await;
        let boundary = registry
            .add_player(Player::connected(
                2,
                "boundary",
                Privileges::NORMAL,
                now - Duration::seconds(300),
            ))
            .await;
        let fresh = registry
            .add_player(Player::connected(3, "fresh", Privileges::NORMAL, now))
            .await;

        assert_eq!(eviction.tick().await.unwrap(), 1);

        assert!(!ghost.read().await.online);
        assert!(boundary.read().await.online);
        assert!(fresh.read().await.online);
        assert!(registry.player(1).await.is_none());

        // already gone: nothing left to evict
        assert_eq!(eviction.tick().await.unwrap(), 0);
    }
}
