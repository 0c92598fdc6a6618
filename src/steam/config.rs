//! Steam Web API configuration.
//!
//! Reads the API key and base URL from environment variables.

use std::env;

/// Default Steam Web API base URL.
const DEFAULT_STEAM_API_URL: &str = "https://api.steampowered.com";

/// Configuration for the Steam Web API client.
#[derive(Debug, Clone)]
pub struct SteamConfig {
    /// Steam Web API key. Every Steam route needs it.
    pub api_key: Option<String>,
    /// Base URL, overridable for staging proxies and tests.
    pub api_url: String,
}

impl SteamConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("STEAM_API_KEY").ok().filter(|k| !k.is_empty()),
            api_url: env::var("STEAM_API_URL")
                .unwrap_or_else(|_| DEFAULT_STEAM_API_URL.to_string()),
        }
    }

    /// Check if the Steam API is configured (API key present).
    pub fn enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn player_summaries_url(&self) -> String {
        format!("{}/ISteamUser/GetPlayerSummaries/v0002/", self.api_url)
    }

    pub fn friend_list_url(&self) -> String {
        format!("{}/ISteamUser/GetFriendList/v0001/", self.api_url)
    }

    pub fn owned_games_url(&self) -> String {
        format!("{}/IPlayerService/GetOwnedGames/v0001/", self.api_url)
    }

    pub fn recently_played_url(&self) -> String {
        format!("{}/IPlayerService/GetRecentlyPlayedGames/v0001/", self.api_url)
    }
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
