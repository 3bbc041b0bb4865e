pub mod availability;
pub mod error;
pub mod ledger;
pub mod lifecycle;

pub use error::LedgerError;
pub use ledger::{AvailabilityLedger, LedgerPolicy};
