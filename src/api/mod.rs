//! JSON HTTP API over the ledger.
//!
//! Every `/api` route except login authenticates with HTTP Basic credentials. Reads are
//! open to any account; record and user writes require an admin.

pub mod auth;
pub mod error;
pub mod extract;
pub mod routes;

use crate::config::AppConfig;
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// State shared across handlers
pub struct AppState {
    /// Store connection
    pub db: DatabaseConnection,
    /// Loaded application configuration
    pub config: AppConfig,
}

/// Handle passed to every handler
pub type SharedState = Arc<AppState>;

/// Create the API router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/login", post(routes::login))
        // Records
        .route(
            "/api/records",
            get(routes::list_records).post(routes::create_record),
        )
        .route(
            "/api/records/{id}",
            put(routes::update_record).delete(routes::delete_record),
        )
        // Reports
        .route("/api/rankings/{scope}", get(routes::ranking))
        .route("/api/stats/{granularity}", get(routes::time_series))
        .route("/api/summary", get(routes::summary))
        .route("/api/names", get(routes::person_names))
        .route("/api/departments", get(routes::departments))
        // Users
        .route("/api/users", get(routes::list_users).post(routes::add_user))
        .route("/api/users/{username}", delete(routes::delete_user))
        .with_state(state)
}
