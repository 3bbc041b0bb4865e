use crate::booking::{Booking, BookingStatus};
use crate::car::Car;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Catalog of listed cars.
///
/// The availability ledger is the only writer of the manual-block and
/// blocked-date sets; no other component touches them.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_car(&self, car: &Car) -> Result<(), StoreError>;

    async fn get_car(&self, id: Uuid) -> Result<Option<Car>, StoreError>;

    async fn list_cars(&self) -> Result<Vec<Car>, StoreError>;

    /// Replace both availability sets in one write.
    async fn set_availability(
        &self,
        id: Uuid,
        manual_blocks: BTreeSet<NaiveDate>,
        blocked_dates: BTreeSet<NaiveDate>,
    ) -> Result<(), StoreError>;
}

/// Booking records, the source of truth for reservation intent.
///
/// No atomic check-and-insert is offered; the ledger serializes the
/// availability check and the insert per car instead.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError>;

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>, StoreError>;

    /// Bookings for a car whose status still counts toward overlap checks.
    async fn list_active(&self, car_id: Uuid) -> Result<Vec<Booking>, StoreError>;

    /// Everything the user rented, newest first.
    async fn list_for_renter(&self, renter_id: &str) -> Result<Vec<Booking>, StoreError>;

    async fn update_status(&self, id: Uuid, status: BookingStatus) -> Result<(), StoreError>;

    /// Confirmed bookings across all cars, for the completion sweep.
    async fn list_confirmed(&self) -> Result<Vec<Booking>, StoreError>;
}

/// Best-effort outbound messaging. Failures never affect booking state.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        recipient_id: &str,
        message: &str,
        related_car_id: Uuid,
    ) -> Result<(), StoreError>;
}
