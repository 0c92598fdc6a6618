//! Steam Web API client.
//!
//! [`SteamApi`] is the contract the routes and the friend aggregation engine
//! consume; [`SteamWebClient`] implements it over HTTP. Each method is a
//! single upstream call with a single classified result. Nothing here
//! retries.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::config::SteamConfig;
use super::types::{
    OwnedGame, ProfileRecord, RecentGame, SteamFriendListEnvelope, SteamOwnedGamesEnvelope,
    SteamPlayersEnvelope, SteamRecentGamesEnvelope,
};
use crate::error::UpstreamError;

/// Identifier → data lookups against Steam.
#[async_trait]
pub trait SteamApi: Send + Sync {
    /// Resolve one SteamID into its display record.
    async fn resolve_identity(&self, steam_id: &str) -> Result<ProfileRecord, UpstreamError>;

    /// Fetch the ordered friend SteamIDs of one user.
    ///
    /// Fails with [`UpstreamError::Hidden`] when the friend list is private.
    async fn lookup_relations(&self, steam_id: &str) -> Result<Vec<String>, UpstreamError>;

    /// Fetch a user's game library.
    ///
    /// Fails with [`UpstreamError::Hidden`] when the library is private.
    async fn owned_games(&self, steam_id: &str) -> Result<Vec<OwnedGame>, UpstreamError>;

    /// Fetch games played in the last two weeks.
    async fn recently_played(&self, steam_id: &str) -> Result<Vec<RecentGame>, UpstreamError>;
}

/// Map a non-success Steam status onto the error taxonomy.
///
/// Steam answers 401 for private friend lists and 400/500 for malformed or
/// unknown SteamIDs.
pub fn classify_status(status: StatusCode) -> UpstreamError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => UpstreamError::Hidden,
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::INTERNAL_SERVER_ERROR => {
            UpstreamError::InvalidIdentifier
        }
        other => UpstreamError::Unavailable(format!("HTTP {}", other.as_u16())),
    }
}

/// [`SteamApi`] over the public Steam Web API.
#[derive(Clone)]
pub struct SteamWebClient {
    http: Client,
    config: SteamConfig,
}

impl SteamWebClient {
    pub fn new(http: Client, config: SteamConfig) -> Self {
        Self { http, config }
    }

    /// GET a Steam endpoint with the API key attached and decode the body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        params: &[(&str, &str)],
    ) -> Result<T, UpstreamError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(UpstreamError::NotConfigured("Steam API"))?;

        let response = self
            .http
            .get(url)
            .query(&[("key", api_key), ("format", "json")])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                // The URL carries the API key; keep it out of logs.
                let e = e.without_url();
                tracing::error!("Steam API request error: {}", e);
                UpstreamError::Unavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Steam API request failed");
            return Err(classify_status(status));
        }

        response.json::<T>().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!("Failed to parse Steam API response: {}", e);
            UpstreamError::Unavailable(e.to_string())
        })
    }
}

#[async_trait]
impl SteamApi for SteamWebClient {
    async fn resolve_identity(&self, steam_id: &str) -> Result<ProfileRecord, UpstreamError> {
        let envelope: SteamPlayersEnvelope = self
            .get_json(self.config.player_summaries_url(), &[("steamids", steam_id)])
            .await?;

        envelope
            .response
            .players
            .into_iter()
            .next()
            .map(ProfileRecord::from)
            .ok_or(UpstreamError::InvalidIdentifier)
    }

    async fn lookup_relations(&self, steam_id: &str) -> Result<Vec<String>, UpstreamError> {
        let envelope: SteamFriendListEnvelope = self
            .get_json(
                self.config.friend_list_url(),
                &[("steamid", steam_id), ("relationship", "friend")],
            )
            .await?;

        Ok(envelope
            .friendslist
            .friends
            .into_iter()
            .map(|f| f.steamid)
            .collect())
    }

    async fn owned_games(&self, steam_id: &str) -> Result<Vec<OwnedGame>, UpstreamError> {
        let envelope: SteamOwnedGamesEnvelope = self
            .get_json(
                self.config.owned_games_url(),
                &[
                    ("steamid", steam_id),
                    ("include_appinfo", "1"),
                    ("include_played_free_games", "1"),
                ],
            )
            .await?;

        envelope.response.games.ok_or(UpstreamError::Hidden)
    }

    async fn recently_played(&self, steam_id: &str) -> Result<Vec<RecentGame>, UpstreamError> {
        let envelope: SteamRecentGamesEnvelope = self
            .get_json(self.config.recently_played_url(), &[("steamid", steam_id)])
            .await?;

        Ok(envelope.response.games)
    }
}
