//! Steam API handlers.
//!
//! - `GET /steam/friendlist?steamid=ID`     — User plus resolved friends
//! - `GET /steam/getuser?steamid=ID`        — One user's profile record
//! - `GET /steam/recentlyplayed?steamid=ID` — Games played in the last two weeks
//! - `GET /steam/ownedgames?steamid=ID`     — Full game library, most played first
//!
//! Domain failures are answered with HTTP 200 and an `error` field.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::client::SteamApi;
use super::friends::{FriendAggregator, FriendListOutcome};
use crate::error::{HubError, Result, UpstreamError};

/// Error sent when `steamid` is absent or empty.
pub const MISSING_STEAMID: &str = "You must provide a SteamID.";

/// Shared state for the Steam routes.
#[derive(Clone)]
pub struct SteamState {
    pub api: Arc<dyn SteamApi>,
    pub friends: FriendAggregator,
}

impl SteamState {
    pub fn new(api: Arc<dyn SteamApi>, friends: FriendAggregator) -> Self {
        Self { api, friends }
    }
}

/// Query parameters shared by every Steam route.
#[derive(Debug, Deserialize)]
pub struct SteamIdQuery {
    pub steamid: Option<String>,
}

impl SteamIdQuery {
    fn require(self) -> Result<String> {
        self.steamid
            .filter(|id| !id.is_empty())
            .ok_or(HubError::MissingParameter(MISSING_STEAMID))
    }
}

impl IntoResponse for FriendListOutcome {
    fn into_response(self) -> Response {
        match self {
            FriendListOutcome::Complete(friends) => Json(friends).into_response(),
            FriendListOutcome::Hidden(hidden) => Json(hidden).into_response(),
        }
    }
}

/// Build the `/steam/*` routes.
pub fn router(state: SteamState) -> Router {
    Router::new()
        .route("/steam/friendlist", get(friend_list))
        .route("/steam/getuser", get(get_user))
        .route("/steam/recentlyplayed", get(recently_played))
        .route("/steam/ownedgames", get(owned_games))
        .with_state(state)
}

/// Resolve a user and all of their friends.
///
/// GET /steam/friendlist?steamid=76561197960435530
pub async fn friend_list(
    State(state): State<SteamState>,
    Query(query): Query<SteamIdQuery>,
) -> Result<FriendListOutcome> {
    let steam_id = query.require()?;
    state.friends.resolve_friends(&steam_id).await
}

/// GET /steam/getuser?steamid=76561197960435530
pub async fn get_user(
    State(state): State<SteamState>,
    Query(query): Query<SteamIdQuery>,
) -> Result<impl IntoResponse> {
    let steam_id = query.require()?;
    let userdata = state.api.resolve_identity(&steam_id).await?;
    Ok(Json(json!({ "userdata": userdata })))
}

/// GET /steam/recentlyplayed?steamid=76561197960435530
pub async fn recently_played(
    State(state): State<SteamState>,
    Query(query): Query<SteamIdQuery>,
) -> Result<impl IntoResponse> {
    let steam_id = query.require()?;
    let games = state.api.recently_played(&steam_id).await?;
    Ok(Json(json!({ "games": games })))
}

/// GET /steam/ownedgames?steamid=76561197960435530
pub async fn owned_games(
    State(state): State<SteamState>,
    Query(query): Query<SteamIdQuery>,
) -> Result<impl IntoResponse> {
    let steam_id = query.require()?;
    let mut games = match state.api.owned_games(&steam_id).await {
        Ok(games) => games,
        Err(UpstreamError::Hidden) => return Err(HubError::GamesUnavailable),
        Err(e) => return Err(e.into()),
    };
    games.sort_by(|a, b| b.playtime_forever.cmp(&a.playtime_forever));

    Ok(Json(json!({ "owned_games": games })))
}
