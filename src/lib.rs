// Library root - shared by the server binary, the tools in src/bin and the tests

pub mod background;
pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{AttendanceError, InvalidParameter, StoreError, ValidationError};
pub use services::AttendanceService;

use axum::{
    routing::get,
    Router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub service: AttendanceService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn services::EventStore>, config: Config) -> Self {
        Self {
            service: AttendanceService::new(store),
            config: Arc::new(config),
        }
    }
}

/// HTTP surface of the attendance engine.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/attendance",
            get(handlers::get_attendance).post(handlers::record_attendance),
        )
        .route("/attendance/summary", get(handlers::get_attendance_summary))
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
