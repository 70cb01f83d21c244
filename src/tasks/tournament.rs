//! Tournament Match Monitor
//!
//! Disposes tournament matches that have stayed empty past the grace period.
//!
//! A match counts as empty from the last tick that saw an occupied slot. Once
//! the grace period has fully elapsed the match is torn down in a fixed order:
//! pending start timers are cancelled, the match leaves the registry, and the
//! lobby is told it is gone.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::Result;
use crate::session::{Occupancy, Packet, SessionRegistry};
use crate::tasks::{PeriodicTask, Services};

pub struct TournamentMonitor {
    registry: Arc<dyn SessionRegistry>,
    clock: Arc<dyn Clock>,
    grace: Duration,
    lobby: String,
}

impl TournamentMonitor {
    pub fn new(services: &Services, grace: Duration, lobby: impl Into<String>) -> Self {
        Self {
            registry: services.registry.clone(),
            clock: services.clock.clone(),
            grace,
            lobby: lobby.into(),
        }
    }
}

#[async_trait]
impl PeriodicTask for TournamentMonitor {
    fn name(&self) -> &'static str {
        "tournament-monitor"
    }

    async fn tick(&self) -> Result<usize> {
        let now = self.clock.now();
        let mut disposed = 0;

        for handle in self.registry.matches().await {
            let (id, label) = {
                let mut m = handle.write().await;
                if !m.is_tournament {
                    continue;
                }

                // a disposed match still registered was interrupted mid-teardown
                if !m.is_disposed() {
                    match m.observe(now, self.grace) {
                        Occupancy::Abandoned => {}
                        Occupancy::Idle { empty_for } => {
                            debug!("Tournament match {} empty for {}s", *m, empty_for.num_seconds());
                            continue;
                        }
                        Occupancy::Active => continue,
                    }
                }

                m.dispose();
                (m.id, m.to_string())
            };

            self.registry.remove_match(id).await;

            if let Some(lobby) = self.registry.channel(&self.lobby).await {
                lobby.enqueue(Packet::DisposeMatch(id)).await;
            }

            info!("Tournament match {} finished.", label);
            disposed += 1;
        }

        Ok(disposed)
    }

    /// Teardown must run to completion once it starts.
    fn cancel_safe(&self) -> bool {
        false
    }
}
