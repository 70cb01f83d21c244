//! Player Session Module
//!
//! Live (or lazily loaded) state of a single user.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::session::{Packet, Privileges, UserId};
use crate::store::UserRow;

// == Player ==
/// A player session held by the registry.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: UserId,
    pub name: String,
    pub privileges: Privileges,
    /// Unix seconds, 0 when no subscription is active
    pub subscription_expiry: i64,
    /// Last time any packet was received from the client
    pub last_recv_time: DateTime<Utc>,
    pub online: bool,
    /// Packets waiting to be flushed to the client
    queue: Vec<Packet>,
}

impl Player {
    // == Constructors ==
    /// Creates a connected session that was last heard from at `now`.
    pub fn connected(id: UserId, name: impl Into<String>, privileges: Privileges, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            privileges,
            subscription_expiry: 0,
            last_recv_time: now,
            online: true,
            queue: Vec::new(),
        }
    }

    /// Creates an offline session from a persisted record.
    pub fn from_row(row: UserRow, now: DateTime<Utc>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            privileges: row.privileges,
            subscription_expiry: row.subscription_expiry,
            last_recv_time: now,
            online: false,
            queue: Vec::new(),
        }
    }

    /// Time since the client was last heard from.
    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        now - self.last_recv_time
    }

    // == Outbound Queue ==
    pub fn enqueue(&mut self, packet: Packet) {
        self.queue.push(packet);
    }

    pub fn pending(&self) -> &[Packet] {
        &self.queue
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} ({})>", self.name, self.id)
    }
}
