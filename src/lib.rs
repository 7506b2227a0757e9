pub mod allocator;
pub mod config;
pub mod controllers;
pub mod ledger;
pub mod models;
pub mod pool;
pub mod services;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use ledger::{JsonFileStore, Ledger, SeatStore, StorageError};
use services::ReservationService;

// Shared state for the whole application
pub struct AppState {
    pub reservations: ReservationService,
    pub config: config::Config,
}

impl AppState {
    pub async fn new(config: config::Config) -> Result<Arc<Self>, StorageError> {
        let store = Arc::new(JsonFileStore::new(config.storage.db_file_path.clone()));
        Self::with_store(config, store).await
    }

    pub async fn with_store(
        config: config::Config,
        store: Arc<dyn SeatStore>,
    ) -> Result<Arc<Self>, StorageError> {
        let reservations = ReservationService::init(config.coach.layout(), Ledger::new(store)).await?;
        Ok(Arc::new(Self { reservations, config }))
    }
}

/// Full HTTP surface: banner, health check and the `/api` routes.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Train Reservation API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
