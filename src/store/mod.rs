//! Durable Store Module
//!
//! Narrow interface to the persistent user record store, plus an in-memory
//! implementation.

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::session::{Privileges, UserId};

// == Queries ==
/// Prepared queries the housekeeping loops issue against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreQuery {
    /// Users whose subscription expiry is at or before `now` and who hold any bit of `privilege`
    ExpiredSubscribers { now: i64, privilege: Privileges },
    /// Zero the subscription expiry of one user
    ClearSubscriptionExpiry { user_id: UserId },
    /// Overwrite the privilege mask of one user
    UpdatePrivileges { user_id: UserId, privileges: Privileges },
    /// Load a single user record
    LoadUser { user_id: UserId },
}

/// A persisted user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: UserId,
    pub name: String,
    pub privileges: Privileges,
    /// Unix seconds, 0 when no subscription is active
    pub subscription_expiry: i64,
}

/// Persistent record store.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Runs a read query and returns every matching row.
    async fn fetch_all(&self, query: StoreQuery) -> Result<Vec<UserRow>>;

    /// Runs a write query and returns the number of affected rows.
    async fn execute(&self, query: StoreQuery) -> Result<u64>;
}
