//! HTTP layer - axum router, shared state and handlers.
//!
//! Routes are served both at the root and under `/api`. Every error leaves as
//! `{"error": "<message>"}`.

/// Error-to-response mapping and fallbacks
pub mod error;
/// Extractors with JSON rejections
pub mod extract;
/// Endpoint implementations (student, schedule, report, general)
pub mod handlers;

use crate::config::AppConfig;
use axum::{
    Router,
    routing::{get, put},
};
use handlers::{general, report, schedule, student};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared data available to all handlers.
/// Holds the database connection and the loaded configuration.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all database operations
    pub database: Arc<DatabaseConnection>,
    /// Settings loaded at startup
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Creates a new `AppState` from a connection and configuration.
    #[must_use]
    pub fn new(database: DatabaseConnection, config: AppConfig) -> Self {
        Self {
            database: Arc::new(database),
            config: Arc::new(config),
        }
    }
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(general::health).fallback(error::method_not_allowed))
        .route(
            "/students",
            get(student::list)
                .post(student::create)
                .fallback(error::method_not_allowed),
        )
        .route(
            "/students/:id",
            get(student::show)
                .put(student::update)
                .fallback(error::method_not_allowed),
        )
        .route(
            "/students/:id/archive",
            put(student::archive).fallback(error::method_not_allowed),
        )
        .route(
            "/students/:id/clear-dues",
            put(student::clear_dues).fallback(error::method_not_allowed),
        )
        .route(
            "/students/:id/topup",
            put(student::top_up).fallback(error::method_not_allowed),
        )
        .route(
            "/students/:id/payments",
            get(student::payments).fallback(error::method_not_allowed),
        )
        .route(
            "/students/:id/invoice",
            get(student::invoice).fallback(error::method_not_allowed),
        )
        .route(
            "/schedule",
            get(schedule::list)
                .post(schedule::create)
                .fallback(error::method_not_allowed),
        )
        .route(
            "/schedule/:id",
            axum::routing::delete(schedule::delete).fallback(error::method_not_allowed),
        )
        .route(
            "/schedule/:id/status",
            put(schedule::update_status).fallback(error::method_not_allowed),
        )
        .route(
            "/dashboard",
            get(report::dashboard).fallback(error::method_not_allowed),
        )
        .route(
            "/reports/monthly",
            get(report::monthly).fallback(error::method_not_allowed),
        )
        .route(
            "/reports/pending",
            get(report::pending).fallback(error::method_not_allowed),
        )
}

/// Builds the application router with tracing and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes())
        .nest("/api", routes())
        .fallback(error::handler404)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
