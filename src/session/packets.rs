//! Outbound messages queued for sessions and channels.
//!
//! Encoding to the client wire format happens elsewhere; housekeeping only
//! decides what gets sent.

use serde::Serialize;

use crate::session::MatchId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum Packet {
    /// One-way text notification shown to a single player
    Notification(String),
    /// Tells lobby listeners that a match no longer exists
    DisposeMatch(MatchId),
}

impl Packet {
    pub fn notification(text: impl Into<String>) -> Self {
        Packet::Notification(text.into())
    }
}
