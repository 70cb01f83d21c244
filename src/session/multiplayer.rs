//! Match Session Module
//!
//! Multiplayer match state, including the occupancy bookkeeping used to detect
//! abandoned tournament matches.

use std::fmt;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::session::{MatchId, PendingTimer, StartTimers, UserId};

// == Slot ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Open,
    Locked,
    Occupied(UserId),
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        !matches!(self, Slot::Occupied(_))
    }
}

/// Result of comparing a match's occupancy against the grace period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupancy {
    /// At least one slot is taken
    Active,
    /// Every slot is empty but the grace period has not run out
    Idle { empty_for: Duration },
    /// Empty for longer than the grace period
    Abandoned,
}

// == Match ==
#[derive(Debug)]
pub struct Match {
    pub id: MatchId,
    pub name: String,
    pub slots: Vec<Slot>,
    pub is_tournament: bool,
    /// Last time the match was observed with at least one occupied slot
    pub last_empty_check: DateTime<Utc>,
    starting: Option<StartTimers>,
    disposed: bool,
}

impl Match {
    // == Constructor ==
    /// Creates a match with `slot_count` open slots, counted as occupied at `now`.
    pub fn new(
        id: MatchId,
        name: impl Into<String>,
        slot_count: usize,
        is_tournament: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            slots: vec![Slot::Open; slot_count],
            is_tournament,
            last_empty_check: now,
            starting: None,
            disposed: false,
        }
    }

    // == Slots ==
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Slot::is_empty)
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.is_empty()).count()
    }

    /// Seats `user` in the first open slot, returning its index.
    pub fn join(&mut self, user: UserId) -> Option<usize> {
        let index = self.slots.iter().position(|slot| *slot == Slot::Open)?;
        self.slots[index] = Slot::Occupied(user);
        Some(index)
    }

    /// Frees the slot held by `user`. Returns false if the user was not seated.
    pub fn leave(&mut self, user: UserId) -> bool {
        match self
            .slots
            .iter()
            .position(|slot| *slot == Slot::Occupied(user))
        {
            Some(index) => {
                self.slots[index] = Slot::Open;
                true
            }
            None => false,
        }
    }

    // == Occupancy ==
    /// Classifies the match at `now`, refreshing `last_empty_check` whenever a
    /// slot is occupied.
    pub fn observe(&mut self, now: DateTime<Utc>, grace: Duration) -> Occupancy {
        if !self.is_empty() {
            self.last_empty_check = now;
            return Occupancy::Active;
        }

        let empty_for = now - self.last_empty_check;
        if empty_for > grace {
            Occupancy::Abandoned
        } else {
            Occupancy::Idle { empty_for }
        }
    }

    // == Start Countdown ==
    /// Schedules the match start after `countdown`, with an alert `lead` before
    /// the start for every entry of `alert_leads` shorter than the countdown.
    ///
    /// Replaces (and cancels) any countdown already pending.
    pub fn start_countdown<F>(&mut self, countdown: StdDuration, alert_leads: &[StdDuration], on_start: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.cancel_countdown();

        let id = self.id;
        let alerts = alert_leads
            .iter()
            .filter(|lead| **lead < countdown)
            .map(|lead| {
                let remaining = lead.as_secs();
                PendingTimer::schedule(countdown - *lead, async move {
                    info!("Match {} starting in {} seconds", id, remaining);
                })
            })
            .collect();

        self.starting = Some(StartTimers::new(
            PendingTimer::schedule(countdown, on_start),
            alerts,
        ));
    }

    /// Cancels a pending countdown. Returns false if none was pending.
    pub fn cancel_countdown(&mut self) -> bool {
        match self.starting.take() {
            Some(timers) => {
                timers.cancel_all();
                true
            }
            None => false,
        }
    }

    pub fn pending_start(&self) -> Option<&StartTimers> {
        self.starting.as_ref()
    }

    // == Teardown ==
    /// Cancels every pending start timer and marks the match for removal.
    ///
    /// Returns the bundle that was cancelled so callers can inspect it.
    pub fn dispose(&mut self) -> Option<StartTimers> {
        let cancelled = self.starting.take();
        if let Some(timers) = &cancelled {
            timers.cancel_all();
        }
        self.disposed = true;
        cancelled
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} ({})>", self.name, self.id)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn grace() -> Duration {
        Duration::seconds(3600)
    }

    #[test]
    fn test_join_and_leave() {
        let now = Utc::now();
        let mut m = Match::new(1, "lobby", 2, true, now);
        assert!(m.is_empty());

        assert_eq!(m.join(10), Some(0));
        assert_eq!(m.join(11), Some(1));
        assert_eq!(m.join(12), None);
        assert_eq!(m.occupied_count(), 2);

        assert!(m.leave(10));
        assert!(!m.leave(10));
        assert_eq!(m.occupied_count(), 1);
    }

    #[test]
    fn test_locked_slots_count_as_empty() {
        let mut m = Match::new(1, "locked", 2, true, Utc::now());
        m.slots[0] = Slot::Locked;
        assert!(m.is_empty());
        assert_eq!(m.join(4), Some(1));
    }

    #[test]
    fn test_observe_occupied_refreshes_timestamp() {
        let start = Utc::now();
        let mut m = Match::new(1, "t", 4, true, start);
        m.join(3);

        let later = start + Duration::seconds(500);
        assert_eq!(m.observe(later, grace()), Occupancy::Active);
        assert_eq!(m.last_empty_check, later);
    }

    #[test]
    fn test_observe_empty_counts_from_last_occupied() {
        let start = Utc::now();
        let mut m = Match::new(1, "t", 4, true, start);

        let at = start + Duration::seconds(600);
        assert_eq!(
            m.observe(at, grace()),
            Occupancy::Idle {
                empty_for: Duration::seconds(600)
            }
        );
        assert_eq!(m.last_empty_check, start);
    }

    #[test]
    fn test_observe_grace_boundary() {
        let start = Utc::now();
        let mut m = Match::new(1, "t", 4, true, start);

        assert!(matches!(
            m.observe(start + grace(), grace()),
            Occupancy::Idle { .. }
        ));
        assert_eq!(
            m.observe(start + grace() + Duration::seconds(1), grace()),
            Occupancy::Abandoned
        );
    }

    #[tokio::test]
    async fn test_dispose_cancels_pending_start() {
        let mut m = Match::new(1, "t", 4, true, Utc::now());
        m.start_countdown(
            StdDuration::from_secs(30),
            &[StdDuration::from_secs(10), StdDuration::from_secs(5)],
            async {},
        );
        assert_eq!(m.pending_start().map(|t| t.alerts.len()), Some(2));

        let cancelled = m.dispose().expect("countdown was pending");
        assert!(cancelled.all_cancelled());
        assert!(m.pending_start().is_none());
        assert!(m.is_disposed());
    }

    #[tokio::test]
    async fn test_dispose_without_countdown() {
        let mut m = Match::new(1, "t", 4, true, Utc::now());
        assert!(m.dispose().is_none());
        assert!(m.is_disposed());
    }

    #[tokio::test]
    async fn test_countdown_replace_and_cancel() {
        let mut m = Match::new(1, "t", 4, false, Utc::now());
        m.start_countdown(StdDuration::from_secs(30), &[], async {});
        assert!(!m.pending_start().unwrap().start.is_cancelled());

        m.start_countdown(StdDuration::from_secs(60), &[StdDuration::from_secs(90)], async {});
        // alert leads longer than the countdown are dropped
        assert_eq!(m.pending_start().unwrap().alerts.len(), 0);

        assert!(m.cancel_countdown());
        assert!(!m.cancel_countdown());
    }
}
