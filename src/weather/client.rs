//! Geocoding and forecast clients.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::config::WeatherConfig;
use crate::error::UpstreamError;

/// A geocoded place.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub place_name: String,
}

/// Address → coordinates → current conditions.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// Resolve a free-text address to its best match.
    async fn geocode(&self, address: &str) -> Result<Location, UpstreamError>;

    /// Describe current conditions at a coordinate in one sentence.
    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<String, UpstreamError>;
}

#[derive(Debug, Deserialize)]
struct MapboxResponse {
    #[serde(default)]
    features: Vec<MapboxFeature>,
}

#[derive(Debug, Deserialize)]
struct MapboxFeature {
    /// `[longitude, latitude]`
    center: [f64; 2],
    place_name: String,
}

/// weatherstack answers errors with HTTP 200 and an `error` object.
#[derive(Debug, Deserialize)]
struct WeatherstackResponse {
    current: Option<WeatherstackCurrent>,
    error: Option<WeatherstackError>,
}

#[derive(Debug, Deserialize)]
struct WeatherstackCurrent {
    temperature: f64,
    feelslike: f64,
    #[serde(default)]
    weather_descriptions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WeatherstackError {
    #[serde(default)]
    info: String,
}

/// Render current conditions the way the browser shows them.
pub fn describe(description: &str, temperature: f64, feels_like: f64) -> String {
    format!(
        "{}. It is currently {} degrees out. It feels like {} degrees out.",
        description, temperature, feels_like
    )
}

/// [`WeatherApi`] over Mapbox geocoding and weatherstack.
#[derive(Clone)]
pub struct WeatherClient {
    http: Client,
    config: WeatherConfig,
}

impl WeatherClient {
    pub fn new(http: Client, config: WeatherConfig) -> Self {
        Self { http, config }
    }
}

fn unavailable(context: &str, e: reqwest::Error) -> UpstreamError {
    let e = e.without_url();
    tracing::error!("{}: {}", context, e);
    UpstreamError::Unavailable(e.to_string())
}

#[async_trait]
impl WeatherApi for WeatherClient {
    async fn geocode(&self, address: &str) -> Result<Location, UpstreamError> {
        let token = self
            .config
            .mapbox_token
            .as_deref()
            .ok_or(UpstreamError::NotConfigured("Geocoding"))?;

        let response = self
            .http
            .get(self.config.geocode_url(address))
            .query(&[("access_token", token), ("limit", "1")])
            .send()
            .await
            .map_err(|e| unavailable("Mapbox request error", e))?;

        if !response.status().is_success() {
            tracing::warn!(status = response.status().as_u16(), "Mapbox request failed");
            return Err(UpstreamError::Unavailable(format!(
                "HTTP {}",
                response.status().as_u16()
            )));
        }

        let body: MapboxResponse = response
            .json()
            .await
            .map_err(|e| unavailable("Failed to parse Mapbox response", e))?;

        body.features
            .into_iter()
            .next()
            .map(|feature| Location {
                longitude: feature.center[0],
                latitude: feature.center[1],
                place_name: feature.place_name,
            })
            .ok_or(UpstreamError::InvalidIdentifier)
    }

    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<String, UpstreamError> {
        let key = self
            .config
            .weatherstack_key
            .as_deref()
            .ok_or(UpstreamError::NotConfigured("Forecast"))?;

        let query = format!("{},{}", latitude, longitude);
        let response = self
            .http
            .get(self.config.current_url())
            .query(&[
                ("access_key", key),
                ("query", query.as_str()),
                ("units", self.config.units.as_str()),
            ])
            .send()
            .await
            .map_err(|e| unavailable("weatherstack request error", e))?;

        let body: WeatherstackResponse = response
            .json()
            .await
            .map_err(|e| unavailable("Failed to parse weatherstack response", e))?;

        if let Some(error) = body.error {
            tracing::warn!(info = error.info.as_str(), "weatherstack rejected request");
            return Err(UpstreamError::InvalidIdentifier);
        }

        let current = body
            .current
            .ok_or_else(|| UpstreamError::Unavailable("missing current conditions".to_string()))?;
        let description = current
            .weather_descriptions
            .first()
            .map(String::as_str)
            .unwrap_or("Unknown conditions");

        Ok(describe(description, current.temperature, current.feelslike))
    }
}
