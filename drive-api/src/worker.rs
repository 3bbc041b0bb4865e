use chrono::Utc;
use drive_ledger::AvailabilityLedger;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info};

/// Background sweep that moves confirmed bookings past their drop-off day
/// to COMPLETED. The only driver of that transition; users never are.
pub async fn start_completion_worker(ledger: Arc<AvailabilityLedger>, period: Duration) {
    let mut ticker = interval(period);
    info!("Completion worker started, sweeping every {:?}", period);

    loop {
        ticker.tick().await;
        let today = Utc::now().date_naive();
        match ledger.complete_elapsed(today).await {
            Ok(0) => {}
            Ok(count) => info!(count, "completed elapsed bookings"),
            Err(e) => error!("Completion sweep failed: {}", e),
        }
    }
}
