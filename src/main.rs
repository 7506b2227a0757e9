use anyhow::Context;
use mimalloc::MiMalloc;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use train_reservation::{app, config::Config, AppState};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("invalid configuration")?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Train Reservation API ({}), {} seats in rows of {}",
        config.app.environment, config.coach.total_seats, config.coach.seats_per_row
    );

    // Load the seat record
    let app_state = AppState::new(config.clone())
        .await
        .with_context(|| format!("failed to load {}", config.storage.db_file_path.display()))?;
    info!(
        "Seat record ready at {}, {} of {} seats available",
        app_state.config.storage.db_file_path.display(),
        app_state.reservations.available_count().await,
        app_state.config.coach.total_seats
    );

    let host: std::net::IpAddr = config
        .app
        .host
        .parse()
        .with_context(|| format!("HOST must be an IP address, got {}", config.app.host))?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app(app_state).into_make_service())
        .await
        .context("server error")?;

    Ok(())
}
