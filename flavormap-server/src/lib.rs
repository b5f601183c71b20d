//! flavormap-server library - primary backend for food spots
//!
//! Serves the dynamic spots resource the client reads and writes, plus the
//! static snapshot route the client falls back to, and the Foodfinity
//! suggestion bot.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod suggest;

use suggest::SuggestionHistory;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Per-user suggestion history, kept in memory only
    pub suggestions: Arc<Mutex<SuggestionHistory>>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            suggestions: Arc::new(Mutex::new(SuggestionHistory::new())),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/spots", get(api::list_spots).post(api::create_spot))
        .route("/data/spots.json", get(api::snapshot))
        .route("/foodfinity/suggest", post(api::suggest))
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
