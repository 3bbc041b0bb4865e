use drive_domain::{BookingStore, CatalogStore};
use drive_ledger::AvailabilityLedger;
use drive_store::ChannelNotifier;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<AvailabilityLedger>,
    pub catalog: Arc<dyn CatalogStore>,
    pub bookings: Arc<dyn BookingStore>,
    pub notifier: Arc<ChannelNotifier>,
    pub auth: AuthConfig,
}
