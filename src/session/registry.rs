//! Session Registry Module
//!
//! Interface to the server's live session state, plus an in-memory
//! implementation backed by a [`DurableStore`] for lazy player loads.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::session::{Channel, Match, MatchId, Player, UserId};
use crate::store::{DurableStore, StoreQuery};

pub type PlayerHandle = Arc<RwLock<Player>>;
pub type MatchHandle = Arc<RwLock<Match>>;
pub type ChannelHandle = Arc<Channel>;

// == Session Registry Trait ==
/// Shared, mutable view of live sessions.
///
/// Every method returns a fresh snapshot; handles stay valid after the
/// registry forgets them.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Every currently connected player.
    async fn online_players(&self) -> Vec<PlayerHandle>;

    /// Every live match, tournament or not.
    async fn matches(&self) -> Vec<MatchHandle>;

    /// Returns the resident session for `id`, loading it from the store if needed.
    ///
    /// `Ok(None)` means no such user exists anywhere.
    async fn player_from_cache_or_store(&self, id: UserId) -> Result<Option<PlayerHandle>>;

    /// Forces a player offline. Returns false if the player was not connected.
    async fn logout(&self, id: UserId) -> bool;

    /// Forgets a match. Returns false if it was already gone.
    async fn remove_match(&self, id: MatchId) -> bool;

    async fn channel(&self, name: &str) -> Option<ChannelHandle>;
}

// == In-Memory Registry ==
pub struct InMemoryRegistry {
    store: Arc<dyn DurableStore>,
    players: RwLock<HashMap<UserId, PlayerHandle>>,
    matches: RwLock<HashMap<MatchId, MatchHandle>>,
    channels: RwLock<HashMap<String, ChannelHandle>>,
}

impl InMemoryRegistry {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self {
            store,
            players: RwLock::new(HashMap::new()),
            matches: RwLock::new(HashMap::new()),
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a player session, replacing any resident session with the same id.
    pub async fn add_player(&self, player: Player) -> PlayerHandle {
        let id = player.id;
        let handle = Arc::new(RwLock::new(player));
        self.players.write().await.insert(id, handle.clone());
        handle
    }

    pub async fn add_match(&self, m: Match) -> MatchHandle {
        let id = m.id;
        let handle = Arc::new(RwLock::new(m));
        self.matches.write().await.insert(id, handle.clone());
        handle
    }

    pub async fn add_channel(&self, name: &str) -> ChannelHandle {
        let handle = Arc::new(Channel::new(name));
        self.channels
            .write()
            .await
            .insert(name.to_string(), handle.clone());
        handle
    }

    /// Returns the resident session for `id` without touching the store.
    pub async fn player(&self, id: UserId) -> Option<PlayerHandle> {
        self.players.read().await.get(&id).cloned()
    }

    pub async fn match_by_id(&self, id: MatchId) -> Option<MatchHandle> {
        self.matches.read().await.get(&id).cloned()
    }

    pub async fn match_count(&self) -> usize {
        self.matches.read().await.len()
    }
}

#[async_trait]
impl SessionRegistry for InMemoryRegistry {
    async fn online_players(&self) -> Vec<PlayerHandle> {
        let resident: Vec<PlayerHandle> = self.players.read().await.values().cloned().collect();

        let mut online = Vec::with_capacity(resident.len());
        for handle in resident {
            if handle.read().await.online {
                online.push(handle);
            }
        }
        online
    }

    async fn matches(&self) -> Vec<MatchHandle> {
        self.matches.read().await.values().cloned().collect()
    }

    async fn player_from_cache_or_store(&self, id: UserId) -> Result<Option<PlayerHandle>> {
        if let Some(handle) = self.player(id).await {
            return Ok(Some(handle));
        }

        let rows = self
            .store
            .fetch_all(StoreQuery::LoadUser { user_id: id })
            .await?;
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        debug!("Loaded user {} from store", id);
        let mut players = self.players.write().await;
        // another caller may have loaded the same user while we awaited the store
        let handle = players
            .entry(id)
            .or_insert_with(|| Arc::new(RwLock::new(Player::from_row(row, Utc::now()))))
            .clone();
        Ok(Some(handle))
    }

    async fn logout(&self, id: UserId) -> bool {
        let Some(handle) = self.players.write().await.remove(&id) else {
            return false;
        };

        let mut player = handle.write().await;
        let was_online = player.online;
        player.online = false;
        was_online
    }

    async fn remove_match(&self, id: MatchId) -> bool {
        self.matches.write().await.remove(&id).is_some()
    }

    async fn channel(&self, name: &str) -> Option<ChannelHandle> {
        self.channels.read().await.get(name).cloned()
    }
}
