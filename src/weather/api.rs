//! Weather API handler.
//!
//! - `GET /weather?address=TEXT` — Geocode the address, then report current conditions

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::client::WeatherApi;
use crate::error::{HubError, Result, UpstreamError};

/// Error sent when `address` is absent or empty.
pub const MISSING_ADDRESS: &str = "You must provide an address!";

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub address: Option<String>,
}

/// Build the `/weather` route.
pub fn router(api: Arc<dyn WeatherApi>) -> Router {
    Router::new().route("/weather", get(weather)).with_state(api)
}

/// GET /weather?address=Boston
pub async fn weather(
    State(api): State<Arc<dyn WeatherApi>>,
    Query(query): Query<WeatherQuery>,
) -> Result<impl IntoResponse> {
    let address = query
        .address
        .filter(|a| !a.trim().is_empty())
        .ok_or(HubError::MissingParameter(MISSING_ADDRESS))?;

    let location = api.geocode(&address).await.map_err(|e| match e {
        UpstreamError::NotConfigured(what) => HubError::NotConfigured(what),
        _ => HubError::LocationNotFound,
    })?;

    let forecast = api
        .forecast(location.latitude, location.longitude)
        .await
        .map_err(|e| match e {
            UpstreamError::NotConfigured(what) => HubError::NotConfigured(what),
            _ => HubError::ForecastUnavailable,
        })?;

    tracing::debug!(place = location.place_name.as_str(), "Weather lookup complete");

    Ok(Json(json!({
        "location": location.place_name,
        "forecast": forecast,
        "address": address,
    })))
}
