//! Weather proxy module.
//!
//! Geocodes a free-text address through Mapbox and reports current
//! conditions from weatherstack, keeping both keys server-side.

pub mod api;
pub mod client;
pub mod config;

pub use client::{WeatherApi, WeatherClient};
pub use config::WeatherConfig;
