//! Steam types.
//!
//! Domain records handed to the browser, plus the Steam Web API wire
//! structures they are decoded from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Online/offline presence derived from Steam's `personastate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonaStatus {
    Online,
    Offline,
}

impl PersonaStatus {
    /// Steam reports `0` for offline; every other state (busy, away,
    /// snooze, looking to trade/play) counts as online.
    pub fn from_persona_state(state: u8) -> Self {
        if state == 0 {
            PersonaStatus::Offline
        } else {
            PersonaStatus::Online
        }
    }
}

/// Resolved display attributes for one SteamID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(rename = "playerName")]
    pub display_name: String,
    #[serde(rename = "playerAvatar")]
    pub avatar_url: String,
    /// Account creation time. Private profiles withhold it.
    #[serde(rename = "playerCreated")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "playerStatus")]
    pub status: PersonaStatus,
}

/// Successful friend-list aggregation, in the shape the browser expects.
///
/// `friendids`, `friendnames` and `friendAvatars` are parallel: index `i`
/// of each describes the same friend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FriendListResponse {
    pub steamusername: String,
    pub steamuseravatar: String,
    pub usercreated: Option<DateTime<Utc>>,
    pub steamuserid: String,
    #[serde(rename = "playerStatus")]
    pub player_status: PersonaStatus,
    pub friendids: Vec<String>,
    pub friendnames: Vec<String>,
    #[serde(rename = "friendAvatars")]
    pub friend_avatars: Vec<String>,
}

/// Response for a user whose friend list is access-restricted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HiddenProfileResponse {
    pub error: String,
    pub username: String,
    /// Always the string `"true"`; the browser client compares against it.
    pub hidden: String,
}

/// A game in a user's library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedGame {
    pub appid: u32,
    #[serde(default)]
    pub name: String,
    /// Total minutes played.
    #[serde(default)]
    pub playtime_forever: u32,
    #[serde(default)]
    pub img_icon_url: String,
}

/// A game played in the last two weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentGame {
    pub appid: u32,
    #[serde(default)]
    pub name: String,
    /// Minutes played in the last two weeks.
    #[serde(default)]
    pub playtime_2weeks: u32,
    #[serde(default)]
    pub playtime_forever: u32,
    #[serde(default)]
    pub img_icon_url: String,
}

// ── Steam Web API wire types ────────────────────────────────────────────────

/// Player summary from GetPlayerSummaries.
#[derive(Debug, Deserialize)]
pub struct SteamPlayerSummary {
    pub personaname: String,
    pub avatar: Option<String>,
    pub avatarmedium: Option<String>,
    pub avatarfull: Option<String>,
    #[serde(default)]
    pub personastate: u8,
    pub timecreated: Option<i64>,
}

impl From<SteamPlayerSummary> for ProfileRecord {
    fn from(player: SteamPlayerSummary) -> Self {
        let avatar_url = player
            .avatarfull
            .or(player.avatarmedium)
            .or(player.avatar)
            .unwrap_or_default();

        Self {
            display_name: player.personaname,
            avatar_url,
            created_at: player
                .timecreated
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            status: PersonaStatus::from_persona_state(player.personastate),
        }
    }
}

/// GetPlayerSummaries response wrapper.
#[derive(Debug, Deserialize)]
pub struct SteamPlayersEnvelope {
    pub response: SteamPlayersResponse,
}

#[derive(Debug, Deserialize)]
pub struct SteamPlayersResponse {
    #[serde(default)]
    pub players: Vec<SteamPlayerSummary>,
}

/// GetFriendList response wrapper.
#[derive(Debug, Deserialize)]
pub struct SteamFriendListEnvelope {
    pub friendslist: SteamFriendList,
}

#[derive(Debug, Deserialize)]
pub struct SteamFriendList {
    #[serde(default)]
    pub friends: Vec<SteamFriend>,
}

#[derive(Debug, Deserialize)]
pub struct SteamFriend {
    pub steamid: String,
}

/// GetOwnedGames response wrapper.
#[derive(Debug, Deserialize)]
pub struct SteamOwnedGamesEnvelope {
    pub response: SteamOwnedGamesResponse,
}

/// `games` is absent (not empty) when the profile hides its library.
#[derive(Debug, Deserialize)]
pub struct SteamOwnedGamesResponse {
    pub games: Option<Vec<OwnedGame>>,
}

/// GetRecentlyPlayedGames response wrapper.
#[derive(Debug, Deserialize)]
pub struct SteamRecentGamesEnvelope {
    pub response: SteamRecentGamesResponse,
}

#[derive(Debug, Deserialize)]
pub struct SteamRecentGamesResponse {
    #[serde(default)]
    pub games: Vec<RecentGame>,
}
