//! Housekeeper - background maintenance for a multiplayer game server
//!
//! Periodic loops that reconcile live session state with durable storage and
//! wall-clock time: subscription expiry, ghost sessions, cached status and
//! abandoned tournament matches.

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::{initialize_housekeeping_tasks, Scheduler, Services};
