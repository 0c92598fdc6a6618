//! Server state management.
//!
//! Holds the server configuration and the upstream clients shared by every
//! request. Nothing here is mutated after startup; per-request state lives
//! in the handlers.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::steam::api::SteamState;
use crate::steam::{FriendAggregator, SteamApi, SteamConfig, SteamWebClient};
use crate::weather::{WeatherApi, WeatherClient, WeatherConfig};

/// Default friend-list resolution timeout in seconds.
const DEFAULT_RESOLVE_TIMEOUT_SECS: u64 = 30;

/// Default timeout for a single upstream HTTP request in seconds.
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct HubConfig {
    pub port: u16,
    /// Ceiling on one whole friend-list request, fan-out included.
    pub resolve_timeout_secs: u64,
    /// Ceiling on one upstream HTTP request.
    pub upstream_timeout_secs: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            resolve_timeout_secs: DEFAULT_RESOLVE_TIMEOUT_SECS,
            upstream_timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
        }
    }
}

/// Shared server state.
#[derive(Clone)]
pub struct HubState {
    pub config: HubConfig,
    pub steam: SteamState,
    pub weather: Arc<dyn WeatherApi>,
}

impl HubState {
    /// Build state backed by the real upstream APIs.
    pub fn new(
        config: HubConfig,
        steam_config: SteamConfig,
        weather_config: WeatherConfig,
    ) -> reqwest::Result<Self> {
        if !steam_config.enabled() {
            tracing::warn!("STEAM_API_KEY not set; Steam routes will report an error");
        }
        if !weather_config.enabled() {
            tracing::warn!("MAPBOX_TOKEN/WEATHERSTACK_KEY not set; weather route will report an error");
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;

        let steam: Arc<dyn SteamApi> = Arc::new(SteamWebClient::new(http.clone(), steam_config));
        let weather: Arc<dyn WeatherApi> = Arc::new(WeatherClient::new(http, weather_config));

        Ok(Self::with_clients(config, steam, weather))
    }

    /// Build state around already-constructed upstream clients.
    pub fn with_clients(
        config: HubConfig,
        steam: Arc<dyn SteamApi>,
        weather: Arc<dyn WeatherApi>,
    ) -> Self {
        let friends = FriendAggregator::new(
            steam.clone(),
            Duration::from_secs(config.resolve_timeout_secs),
        );

        Self {
            config,
            steam: SteamState::new(steam, friends),
            weather,
        }
    }
}
