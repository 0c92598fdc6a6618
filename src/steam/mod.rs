//! Steam module.
//!
//! Proxies the Steam Web API for the browser client, keeping the API key
//! server-side. The interesting part is [`friends`], which fans one user's
//! friend list out into concurrent profile lookups and joins the results.

pub mod api;
pub mod client;
pub mod config;
pub mod friends;
pub mod types;

#[cfg(test)]
pub mod fake;

pub use client::{SteamApi, SteamWebClient};
pub use config::SteamConfig;
pub use friends::FriendAggregator;
