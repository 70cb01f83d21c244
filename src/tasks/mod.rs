//! Background Tasks Module
//!
//! Housekeeping loops that run independently of request handling.
//!
//! # Tasks
//! - Subscription expiry: revokes supporter privileges once they lapse
//! - Ghost eviction: disconnects sessions that stopped sending keep-alives
//! - Status refresh: invalidates the cached bot status
//! - Tournament monitor: disposes tournament matches left empty too long

mod ghosts;
mod scheduler;
mod status_refresh;
mod subscription;
mod tournament;


use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::clock::Clock;
use crate::config::Config;
use crate::error::Result;
use crate::session::{SessionRegistry, StatusCache};
use crate::store::DurableStore;

pub use ghosts::GhostEviction;
pub use scheduler::{FirstRun, Scheduler, TaskSpec, TaskStats, TaskStatus};
pub use status_refresh::StatusRefresh;
pub use subscription::{SubscriptionSweep, EXPIRY_NOTICE};
pub use tournament::TournamentMonitor;

// == Periodic Task ==
/// One housekeeping duty, run by the [`Scheduler`] once per interval.
#[async_trait]
pub trait PeriodicTask: Send + Sync {
    /// Unique name, used in logs and status reports.
    fn name(&self) -> &'static str;

    /// Runs a single pass and returns how many items it acted on.
    async fn tick(&self) -> Result<usize>;

    /// Whether a tick may be abandoned at any await point on shutdown.
    fn cancel_safe(&self) -> bool {
        true
    }
}

// == Services ==
/// Collaborators injected into every housekeeping loop.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn DurableStore>,
    pub registry: Arc<dyn SessionRegistry>,
    pub status: Arc<StatusCache>,
    pub clock: Arc<dyn Clock>,
}

/// Builds the four housekeeping duties from `config` and starts them.
pub async fn initialize_housekeeping_tasks(
    scheduler: &Scheduler,
    services: &Services,
    config: &Config,
) -> Result<()> {
    let every = |secs: u64| Duration::from_secs(secs.max(1));

    scheduler
        .initialize(vec![
            TaskSpec::new(
                Arc::new(SubscriptionSweep::new(services)),
                every(config.subscription_sweep_interval),
            )
            .run_immediately(),
            TaskSpec::new(
                Arc::new(StatusRefresh::new(services)),
                every(config.status_refresh_interval),
            ),
            TaskSpec::new(
                Arc::new(GhostEviction::new(services, config.keepalive())),
                every(config.ghost_sweep_interval),
            ),
            TaskSpec::new(
                Arc::new(TournamentMonitor::new(
                    services,
                    config.match_grace(),
                    config.lobby_channel.clone(),
                )),
                every(config.match_sweep_interval),
            ),
        ])
        .await
}
