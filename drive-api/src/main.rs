use drive_api::{app, state::AuthConfig, worker, AppState};
use drive_ledger::{AvailabilityLedger, LedgerPolicy};
use drive_store::{app_config::Config, ChannelNotifier, MemoryBookingStore, MemoryCatalog};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drive_api=debug,drive_ledger=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting DriveShare API on port {}", config.server.port);

    let catalog = Arc::new(MemoryCatalog::new());
    let bookings = Arc::new(MemoryBookingStore::new());
    let notifier = Arc::new(ChannelNotifier::new(100));

    let policy = LedgerPolicy {
        store_timeout: Duration::from_secs(config.ledger.store_timeout_seconds),
        read_retries: config.ledger.read_retries,
        retry_backoff: Duration::from_millis(config.ledger.retry_backoff_millis),
    };
    let ledger = Arc::new(AvailabilityLedger::new(
        catalog.clone(),
        bookings.clone(),
        notifier.clone(),
        policy,
    ));

    tokio::spawn(worker::start_completion_worker(
        ledger.clone(),
        Duration::from_secs(config.ledger.completion_sweep_seconds),
    ));

    let app_state = AppState {
        ledger,
        catalog,
        bookings,
        notifier,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
