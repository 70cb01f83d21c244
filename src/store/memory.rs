//! In-Memory Store
//!
//! HashMap-backed [`DurableStore`] used by the binary and the test suites.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{HousekeepingError, Result};
use crate::session::UserId;
use crate::store::{DurableStore, StoreQuery, UserRow};

// == In-Memory Store ==
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<UserId, UserRow>>,
    /// When set, every query fails as if the database were unreachable
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user record.
    pub async fn insert(&self, row: UserRow) {
        self.users.write().await.insert(row.id, row);
    }

    pub async fn get(&self, id: UserId) -> Option<UserRow> {
        self.users.read().await.get(&id).cloned()
    }

    /// Simulates an outage (or recovery) of the backing database.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(HousekeepingError::Store(
                "database connection unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DurableStore for InMemoryStore {
    async fn fetch_all(&self, query: StoreQuery) -> Result<Vec<UserRow>> {
        self.check_available()?;
        let users = self.users.read().await;

        let mut rows: Vec<UserRow> = match query {
            StoreQuery::ExpiredSubscribers { now, privilege } => users
                .values()
                .filter(|row| row.subscription_expiry <= now && row.privileges.intersects(privilege))
                .cloned()
                .collect(),
            StoreQuery::LoadUser { user_id } => users.get(&user_id).cloned().into_iter().collect(),
            other => {
                return Err(HousekeepingError::Store(format!(
                    "{:?} is not a read query",
                    other
                )))
            }
        };

        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    async fn execute(&self, query: StoreQuery) -> Result<u64> {
        self.check_available()?;
        let mut users = self.users.write().await;

        match query {
            StoreQuery::ClearSubscriptionExpiry { user_id } => match users.get_mut(&user_id) {
                Some(row) => {
                    row.subscription_expiry = 0;
                    Ok(1)
                }
                None => Ok(0),
            },
            StoreQuery::UpdatePrivileges {
                user_id,
                privileges,
            } => match users.get_mut(&user_id) {
                Some(row) => {
                    row.privileges = privileges;
                    Ok(1)
                }
                None => Ok(0),
            },
            other => Err(HousekeepingError::Store(format!(
                "{:?} is not a write query",
                other
            ))),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Privileges;

    fn row(id: UserId, privileges: Privileges, expiry: i64) -> UserRow {
        UserRow {
            id,
            name: format!("user{}", id),
            privileges,
            subscription_expiry: expiry,
        }
    }

    #[tokio::test]
    async fn test_expired_subscribers_query() {
        let store = InMemoryStore::new();
        let supporter = Privileges::NORMAL | Privileges::SUPPORTER;
        store.insert(row(1, supporter, 100)).await;
        store.insert(row(2, supporter, 200)).await;
        store.insert(row(3, Privileges::NORMAL, 50)).await;
        store.insert(row(4, supporter, 500)).await;

        let rows = store
            .fetch_all(StoreQuery::ExpiredSubscribers {
                now: 200,
                privilege: Privileges::SUPPORTER,
            })
            .await
            .unwrap();

        let ids: Vec<UserId> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_execute_clears_expiry_and_privileges() {
        let store = InMemoryStore::new();
        store
            .insert(row(7, Privileges::NORMAL | Privileges::SUPPORTER, 100))
            .await;

        let affected = store
            .execute(StoreQuery::ClearSubscriptionExpiry { user_id: 7 })
            .await
            .unwrap();
        assert_eq!(affected, 1);

        store
            .execute(StoreQuery::UpdatePrivileges {
                user_id: 7,
                privileges: Privileges::NORMAL,
            })
            .await
            .unwrap();

        let stored = store.get(7).await.unwrap();
        assert_eq!(stored.subscription_expiry, 0);
        assert_eq!(stored.privileges, Privileges::NORMAL);
    }

    #[tokio::test]
    async fn test_execute_missing_user_affects_nothing() {
        let store = InMemoryStore::new();
        let affected = store
            .execute(StoreQuery::ClearSubscriptionExpiry { user_id: 99 })
            .await
            .unwrap();
        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_queries() {
        let store = InMemoryStore::new();
        store.set_unavailable(true);

        let result = store.fetch_all(StoreQuery::LoadUser { user_id: 1 }).await;
        assert!(matches!(result, Err(HousekeepingError::Store(_))));

        store.set_unavailable(false);
        assert!(store
            .fetch_all(StoreQuery::LoadUser { user_id: 1 })
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_write_query_rejected_by_fetch_all() {
        let store = InMemoryStore::new();
        let result = store
            .fetch_all(StoreQuery::ClearSubscriptionExpiry { user_id: 1 })
            .await;
        assert!(matches!(result, Err(HousekeepingError::Store(_))));
    }
}
