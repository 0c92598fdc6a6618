//! In-memory [`SteamApi`] for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::client::SteamApi;
use super::types::{OwnedGame, PersonaStatus, ProfileRecord, RecentGame};
use crate::error::UpstreamError;

/// Build an online profile whose avatar URL is derived from its name.
pub fn profile(name: &str) -> ProfileRecord {
    ProfileRecord {
        display_name: name.to_string(),
        avatar_url: format!("https://avatars.example/{}.jpg", name),
        created_at: chrono::DateTime::from_timestamp(1_300_000_000, 0),
        status: PersonaStatus::Online,
    }
}

#[derive(Default)]
pub struct FakeSteam {
    profiles: HashMap<String, ProfileRecord>,
    relations: HashMap<String, Result<Vec<String>, UpstreamError>>,
    owned: HashMap<String, Result<Vec<OwnedGame>, UpstreamError>>,
    recent: HashMap<String, Vec<RecentGame>>,
    delays: HashMap<String, Duration>,
    stalled: HashSet<String>,
    pub resolve_calls: AtomicUsize,
}

impl FakeSteam {
    pub fn with_profile(mut self, steam_id: &str, profile: ProfileRecord) -> Self {
        self.profiles.insert(steam_id.to_string(), profile);
        self
    }

    pub fn with_relations(
        mut self,
        steam_id: &str,
        relations: Result<Vec<String>, UpstreamError>,
    ) -> Self {
        self.relations.insert(steam_id.to_string(), relations);
        self
    }

    pub fn with_owned_games(
        mut self,
        steam_id: &str,
        games: Result<Vec<OwnedGame>, UpstreamError>,
    ) -> Self {
        self.owned.insert(steam_id.to_string(), games);
        self
    }

    pub fn with_recent_games(mut self, steam_id: &str, games: Vec<RecentGame>) -> Self {
        self.recent.insert(steam_id.to_string(), games);
        self
    }

    /// Delay resolution of `steam_id` by `delay`.
    pub fn with_delay(mut self, steam_id: &str, delay: Duration) -> Self {
        self.delays.insert(steam_id.to_string(), delay);
        self
    }

    /// Make resolution of `steam_id` never complete.
    pub fn stalled(mut self, steam_id: &str) -> Self {
        self.stalled.insert(steam_id.to_string());
        self
    }
}

#[async_trait]
impl SteamApi for FakeSteam {
    async fn resolve_identity(&self, steam_id: &str) -> Result<ProfileRecord, UpstreamError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);

        if self.stalled.contains(steam_id) {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = self.delays.get(steam_id) {
            tokio::time::sleep(*delay).await;
        }

        self.profiles
            .get(steam_id)
            .cloned()
            .ok_or(UpstreamError::InvalidIdentifier)
    }

    async fn lookup_relations(&self, steam_id: &str) -> Result<Vec<String>, UpstreamError> {
        self.relations
            .get(steam_id)
            .cloned()
            .unwrap_or(Err(UpstreamError::InvalidIdentifier))
    }

    async fn owned_games(&self, steam_id: &str) -> Result<Vec<OwnedGame>, UpstreamError> {
        self.owned
            .get(steam_id)
            .cloned()
            .unwrap_or(Err(UpstreamError::InvalidIdentifier))
    }

    async fn recently_played(&self, steam_id: &str) -> Result<Vec<RecentGame>, UpstreamError> {
        self.recent
            .get(steam_id)
            .cloned()
            .ok_or(UpstreamError::InvalidIdentifier)
    }
}
