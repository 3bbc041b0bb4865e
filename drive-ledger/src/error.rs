use drive_domain::{PeriodError, RentalPeriod, StoreError};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Bad input. Never retried; surfaced to the caller immediately.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Availability lost the race. The caller must re-query before retrying.
    #[error("car {car_id} is already booked for {period}")]
    Conflict { car_id: Uuid, period: RentalPeriod },

    /// The actor lacks rights over the resource. Terminal.
    #[error("not permitted: {0}")]
    Authorization(String),

    /// Store timeout or outage. Safe to retry with backoff.
    #[error("store unavailable: {0}")]
    Transient(String),
}

impl From<PeriodError> for LedgerError {
    fn from(err: PeriodError) -> Self {
        LedgerError::Validation(err.to_string())
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => LedgerError::Validation(format!("unknown {what}")),
            StoreError::Unavailable(why) => LedgerError::Transient(why),
        }
    }
}
