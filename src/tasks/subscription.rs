//! Subscription Expiry Sweep
//!
//! Revokes supporter privileges from users whose subscription has lapsed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::{HousekeepingError, Result};
use crate::session::{Packet, Privileges, SessionRegistry};
use crate::store::{DurableStore, StoreQuery};
use crate::tasks::{PeriodicTask, Services};

/// Notification sent to online players when their subscription lapses.
pub const EXPIRY_NOTICE: &str = "Your supporter status has expired.";

pub struct SubscriptionSweep {
    store: Arc<dyn DurableStore>,
    registry: Arc<dyn SessionRegistry>,
    clock: Arc<dyn Clock>,
}

impl SubscriptionSweep {
    pub fn new(services: &Services) -> Self {
        Self {
            store: services.store.clone(),
            registry: services.registry.clone(),
            clock: services.clock.clone(),
        }
    }
}

#[async_trait]
impl PeriodicTask for SubscriptionSweep {
    fn name(&self) -> &'static str {
        "subscription-expiry"
    }

    /// Zeroes the expiry before revoking the supporter bits, and notifies only
    /// once both writes landed. A failed write leaves the row matching the
    /// query, so the next tick retries it.
    async fn tick(&self) -> Result<usize> {
        debug!("Removing expired supporter privileges");

        let expired = self
            .store
            .fetch_all(StoreQuery::ExpiredSubscribers {
                now: self.clock.now().timestamp(),
                privilege: Privileges::DONATOR,
            })
            .await?;

        let mut revoked = 0;
        for row in expired {
            let handle = self
                .registry
                .player_from_cache_or_store(row.id)
                .await?
                .ok_or_else(|| {
                    HousekeepingError::InvariantViolation(format!(
                        "user {} has an expired subscription but no loadable session",
                        row.id
                    ))
                })?;

            let mut player = handle.write().await;

            // the privilege write drops the row out of the query, so it goes last
            player.subscription_expiry = 0;
            self.store
                .execute(StoreQuery::ClearSubscriptionExpiry { user_id: player.id })
                .await?;

            player.privileges.remove(Privileges::DONATOR);
            self.store
                .execute(StoreQuery::UpdatePrivileges {
                    user_id: player.id,
                    privileges: player.privileges,
                })
                .await?;

            if player.online {
                player.enqueue(Packet::notification(EXPIRY_NOTICE));
            }

            info!("{}'s supporter status has expired.", *player);
            revoked += 1;
        }

        Ok(revoked)
    }
}
