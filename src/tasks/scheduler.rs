//! Task Scheduler
//!
//! Owns the set of periodic housekeeping tasks: spawns each one exactly once,
//! tracks its handle and statistics, and cancels everything at shutdown.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::{HousekeepingError, Result};
use crate::tasks::PeriodicTask;

// == Task Spec ==
/// When a task runs its first tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstRun {
    Immediately,
    AfterInterval,
}

/// A housekeeping duty waiting to be scheduled.
pub struct TaskSpec {
    pub task: Arc<dyn PeriodicTask>,
    pub interval: Duration,
    pub first_run: FirstRun,
}

impl TaskSpec {
    /// Creates a spec whose first tick happens one interval after start.
    pub fn new(task: Arc<dyn PeriodicTask>, interval: Duration) -> Self {
        Self {
            task,
            interval,
            first_run: FirstRun::AfterInterval,
        }
    }

    pub fn run_immediately(mut self) -> Self {
        self.first_run = FirstRun::Immediately;
        self
    }
}

// == Task Stats ==
/// Running totals for one scheduled task.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskStats {
    /// Ticks that completed successfully
    pub ticks: u64,
    /// Ticks that returned an error
    pub failures: u64,
    /// Items acted on across all successful ticks
    pub affected: u64,
    pub last_tick: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl TaskStats {
    fn record_success(&mut self, affected: usize) {
        self.ticks += 1;
        self.affected += affected as u64;
        self.last_tick = Some(Utc::now());
    }

    fn record_failure(&mut self, err: &HousekeepingError) {
        self.failures += 1;
        self.last_tick = Some(Utc::now());
        self.last_error = Some(err.to_string());
    }
}

/// Point-in-time view of a scheduled task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskStatus {
    pub name: String,
    pub interval_ms: u64,
    pub running: bool,
    #[serde(flatten)]
    pub stats: TaskStats,
}

struct ScheduledTask {
    name: &'static str,
    interval: Duration,
    stats: Arc<RwLock<TaskStats>>,
    handle: JoinHandle<()>,
}

// == Scheduler ==
/// Tracked set of housekeeping tasks sharing one shutdown token.
#[derive(Default)]
pub struct Scheduler {
    shutdown: CancellationToken,
    tasks: RwLock<Vec<ScheduledTask>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns one tokio task per spec and returns without waiting for them.
    ///
    /// Fails with `AlreadyInitialized` if the task set is already populated and
    /// with `DuplicateTask` if two specs share a name; nothing is spawned in
    /// either case.
    pub async fn initialize(&self, specs: Vec<TaskSpec>) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        if !tasks.is_empty() {
            return Err(HousekeepingError::AlreadyInitialized);
        }
        if self.shutdown.is_cancelled() {
            return Err(HousekeepingError::Internal(
                "scheduler has been shut down".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.task.name()) {
                return Err(HousekeepingError::DuplicateTask(spec.task.name().to_string()));
            }
        }

        info!("Initializing {} housekeeping tasks", specs.len());

        for spec in specs {
            let name = spec.task.name();
            let stats = Arc::new(RwLock::new(TaskStats::default()));
            let handle = tokio::spawn(run_periodic(
                spec.task,
                spec.interval,
                spec.first_run,
                self.shutdown.clone(),
                stats.clone(),
            ));

            tasks.push(ScheduledTask {
                name,
                interval: spec.interval,
                stats,
                handle,
            });
        }

        Ok(())
    }

    /// Lists every tracked task with its statistics.
    pub async fn status(&self) -> Vec<TaskStatus> {
        let tasks = self.tasks.read().await;
        let mut statuses = Vec::with_capacity(tasks.len());

        for task in tasks.iter() {
            statuses.push(TaskStatus {
                name: task.name.to_string(),
                interval_ms: task.interval.as_millis() as u64,
                running: !task.handle.is_finished(),
                stats: task.stats.read().await.clone(),
            });
        }

        statuses
    }

    /// Cancels every task and waits for all of them to exit.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let tasks = std::mem::take(&mut *self.tasks.write().await);

        for task in tasks {
            match task.handle.await {
                Ok(()) => debug!("Housekeeping task {} joined", task.name),
                Err(err) if err.is_panic() => {
                    error!("Housekeeping task {} panicked: {}", task.name, err)
                }
                Err(_) => {}
            }
        }

        info!("Housekeeping tasks stopped");
    }
}

// == Runner ==
/// Drives one task until shutdown or a fatal error.
///
/// Cancel-safe tasks are raced against the shutdown token mid-tick; others
/// always finish the tick they started.
async fn run_periodic(
    task: Arc<dyn PeriodicTask>,
    interval: Duration,
    first_run: FirstRun,
    shutdown: CancellationToken,
    stats: Arc<RwLock<TaskStats>>,
) {
    let name = task.name();
    info!(
        "Starting {} task with interval of {} seconds",
        name,
        interval.as_secs_f64()
    );

    if first_run == FirstRun::AfterInterval && !sleep_or_cancel(interval, &shutdown).await {
        return;
    }

    loop {
        let outcome = if task.cancel_safe() {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                outcome = task.tick() => outcome,
            }
        } else {
            task.tick().await
        };

        match outcome {
            Ok(affected) => {
                stats.write().await.record_success(affected);
                if affected > 0 {
                    info!("{}: acted on {} item(s)", name, affected);
                } else {
                    debug!("{}: nothing to do", name);
                }
            }
            Err(err) if err.is_fatal() => {
                stats.write().await.record_failure(&err);
                error!("{} task stopped: {}", name, err);
                return;
            }
            Err(err) => {
                stats.write().await.record_failure(&err);
                warn!("{} tick failed, retrying next interval: {}", name, err);
            }
        }

        if !sleep_or_cancel(interval, &shutdown).await {
            break;
        }
    }

    debug!("{} task cancelled", name);
}

/// Sleeps for `interval`. Returns false if shutdown was requested first.
async fn sleep_or_cancel(interval: Duration, shutdown: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        _ = shutdown.cancelled() => false,
        _ = tokio::time::sleep(interval) => true,
    }
}
