//! Session Module
//!
//! Live player and match state shared between request handling and the
//! housekeeping loops.

mod channel;
mod multiplayer;
mod packets;
mod player;
mod privileges;
mod registry;
mod status;
mod timer;

// Re-export public types
pub use channel::Channel;
pub use multiplayer::{Match, Occupancy, Slot};
pub use packets::Packet;
pub use player::Player;
pub use privileges::Privileges;
pub use registry::{ChannelHandle, InMemoryRegistry, MatchHandle, PlayerHandle, SessionRegistry};
pub use status::{BotStatus, StatusCache};
pub use timer::{PendingTimer, StartTimers};

pub type UserId = u32;
pub type MatchId = u32;
