//! Projects Hub Server
//!
//! JSON endpoints backing the projects hub browser client:
//!
//! 1. **Steam**: friend lists with resolved names and avatars, single user
//!    profiles, owned and recently played games. The Steam Web API key stays
//!    on the server.
//!
//! 2. **Weather**: geocode an address and report current conditions.
//!
//! 3. **Vocabulary quiz**: a fixed set of beginner Japanese phrases.
//!
//! Domain errors are answered with HTTP 200 and `{"error": "..."}`.

mod error;
mod quiz;
mod state;
mod steam;
mod weather;

use axum::{
    extract::Query,
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use clap::Parser;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use error::HubError;
use state::{HubConfig, HubState};
use steam::SteamConfig;
use weather::WeatherConfig;

// ── CLI Arguments ─────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "hub-server", version, about = "Projects hub JSON server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 3000, env = "PORT")]
    port: u16,

    /// Maximum time to resolve one friend list, in seconds
    #[arg(long, default_value_t = 30, env = "RESOLVE_TIMEOUT_SECS")]
    resolve_timeout_secs: u64,

    /// Maximum time for a single upstream HTTP request, in seconds
    #[arg(long, default_value_t = 10, env = "UPSTREAM_TIMEOUT_SECS")]
    upstream_timeout_secs: u64,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// ── Entry Point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hub_server=info,tower_http=info".into());
    if args.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = HubConfig {
        port: args.port,
        resolve_timeout_secs: args.resolve_timeout_secs,
        upstream_timeout_secs: args.upstream_timeout_secs,
    };

    let state = HubState::new(config, SteamConfig::from_env(), WeatherConfig::from_env())
        .expect("Failed to build HTTP client");

    let addr = format!("0.0.0.0:{}", state.config.port);
    let app = app(state);

    tracing::info!("Hub server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

/// Assemble every route group behind CORS and request tracing.
fn app(state: HubState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/products", get(products_handler))
        .merge(steam::api::router(state.steam.clone()))
        .merge(weather::api::router(state.weather.clone()))
        .merge(quiz::router())
        .fallback(not_found_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ── Route Handlers ────────────────────────────────────────────────────────────

/// Health check endpoint.
async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "hub-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Deserialize)]
struct ProductsQuery {
    search: Option<String>,
}

/// Echo a product search term.
async fn products_handler(Query(query): Query<ProductsQuery>) -> Result<impl IntoResponse, HubError> {
    let search = query
        .search
        .filter(|s| !s.is_empty())
        .ok_or(HubError::MissingParameter("You must prove a search term."))?;

    Ok(Json(json!({ "products": [search] })))
}

async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Page not found." })),
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
