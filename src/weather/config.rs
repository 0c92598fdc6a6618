//! Weather proxy configuration.
//!
//! Reads the Mapbox and weatherstack credentials from environment variables.

use std::env;

/// Configuration for the geocoding and forecast upstreams.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// Mapbox access token (geocoding).
    pub mapbox_token: Option<String>,
    /// weatherstack access key (current conditions).
    pub weatherstack_key: Option<String>,
    pub mapbox_api_url: String,
    pub weatherstack_api_url: String,
    /// weatherstack unit system: `m` (metric), `f` (fahrenheit) or `s` (scientific).
    pub units: String,
}

impl WeatherConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            mapbox_token: env::var("MAPBOX_TOKEN").ok().filter(|k| !k.is_empty()),
            weatherstack_key: env::var("WEATHERSTACK_KEY").ok().filter(|k| !k.is_empty()),
            mapbox_api_url: env::var("MAPBOX_API_URL")
                .unwrap_or_else(|_| "https://api.mapbox.com".to_string()),
            weatherstack_api_url: env::var("WEATHERSTACK_API_URL")
                .unwrap_or_else(|_| "http://api.weatherstack.com".to_string()),
            units: env::var("WEATHER_UNITS").unwrap_or_else(|_| "f".to_string()),
        }
    }

    /// Check if both upstreams are configured.
    pub fn enabled(&self) -> bool {
        self.mapbox_token.is_some() && self.weatherstack_key.is_some()
    }

    /// Mapbox forward-geocoding URL for a free-text address.
    pub fn geocode_url(&self, address: &str) -> String {
        format!(
            "{}/geocoding/v5/mapbox.places/{}.json",
            self.mapbox_api_url,
            urlencoding::encode(address)
        )
    }

    pub fn current_url(&self) -> String {
        format!("{}/current", self.weatherstack_api_url)
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
