//! Error types for the hub server.
//!
//! Two layers:
//!
//! - [`UpstreamError`] classifies the outcome of a single upstream call
//!   (Steam Web API, Mapbox, weatherstack).
//! - [`HubError`] is what a route handler returns. Every variant renders as
//!   `{"error": "<message>"}` with HTTP 200, which is what the browser client
//!   expects for domain failures.

use axum::{response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Message sent back when a user's friend list is access-restricted.
///
/// The browser client prefixes it with the resolved username.
pub const HIDDEN_MESSAGE: &str = " is hidden. Friendlist unavailable.";

/// Result alias for route-level operations.
pub type Result<T> = std::result::Result<T, HubError>;

/// Outcome classification for one upstream call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// The profile's friend data is access-restricted.
    #[error("profile is hidden")]
    Hidden,

    /// The upstream does not recognise the identifier (SteamID, address).
    #[error("identifier not recognised by upstream")]
    InvalidIdentifier,

    /// Transport failure, unexpected status, or an undecodable body.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    /// The API key for this upstream is not configured.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

/// Errors surfaced to HTTP callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HubError {
    /// A required query parameter was absent or empty.
    #[error("{0}")]
    MissingParameter(&'static str),

    #[error("SteamID invalid. Try again.")]
    InvalidIdentifier,

    /// Friend list is hidden and no fallback name was produced.
    #[error("{}", HIDDEN_MESSAGE)]
    RelationsHidden,

    #[error("Unable to reach the Steam API. Try again later.")]
    UpstreamUnavailable,

    /// Converting one or more identifiers to display names failed.
    #[error("{0}")]
    ConversionFailure(&'static str),

    #[error("Timed out while resolving the friend list.")]
    TimedOut,

    #[error("{0} is not configured on this server.")]
    NotConfigured(&'static str),

    #[error("Unable to find location. Try another search.")]
    LocationNotFound,

    #[error("An error has occurred with forecast.")]
    ForecastUnavailable,

    #[error("Owned games unavailable. Profile may be hidden.")]
    GamesUnavailable,
}

impl From<UpstreamError> for HubError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Hidden => HubError::RelationsHidden,
            UpstreamError::InvalidIdentifier => HubError::InvalidIdentifier,
            UpstreamError::Unavailable(_) => HubError::UpstreamUnavailable,
            UpstreamError::NotConfigured(what) => HubError::NotConfigured(what),
        }
    }
}

impl IntoResponse for HubError {
    fn into_response(self) -> axum::response::Response {
        Json(json!({ "error": self.to_string() })).into_response()
    }
}
