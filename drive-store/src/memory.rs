use async_trait::async_trait;
use chrono::NaiveDate;
use drive_domain::{Booking, BookingStatus, BookingStore, Car, CatalogStore, StoreError};
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-process catalog store backing the ledger in tests and single-node
/// deployments. A remote document store slots in behind the same trait.
#[derive(Default)]
pub struct MemoryCatalog {
    cars: RwLock<HashMap<Uuid, Car>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn insert_car(&self, car: &Car) -> Result<(), StoreError> {
        self.cars.write().await.insert(car.id, car.clone());
        Ok(())
    }

    async fn get_car(&self, id: Uuid) -> Result<Option<Car>, StoreError> {
        Ok(self.cars.read().await.get(&id).cloned())
    }

    async fn list_cars(&self) -> Result<Vec<Car>, StoreError> {
        let mut cars: Vec<Car> = self.cars.read().await.values().cloned().collect();
        cars.sort_by(|a, b| a.model.cmp(&b.model));
        Ok(cars)
    }

    async fn set_availability(
        &self,
        id: Uuid,
        manual_blocks: BTreeSet<NaiveDate>,
        blocked_dates: BTreeSet<NaiveDate>,
    ) -> Result<(), StoreError> {
        let mut cars = self.cars.write().await;
        let car = cars
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("car {id}")))?;
        car.manual_blocks = manual_blocks;
        car.blocked_dates = blocked_dates;
        Ok(())
    }
}

/// In-process booking store.
#[derive(Default)]
pub struct MemoryBookingStore {
    bookings: RwLock<HashMap<Uuid, Booking>>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        self.bookings
            .write()
            .await
            .insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        Ok(self.bookings.read().await.get(&id).cloned())
    }

    async fn list_active(&self, car_id: Uuid) -> Result<Vec<Booking>, StoreError> {
        Ok(self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| b.car_id == car_id && b.is_active())
            .cloned()
            .collect())
    }

    async fn list_for_renter(&self, renter_id: &str) -> Result<Vec<Booking>, StoreError> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| b.renter_id == renter_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn update_status(&self, id: Uuid, status: BookingStatus) -> Result<(), StoreError> {
        let mut bookings = self.bookings.write().await;
        let booking = bookings
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("booking {id}")))?;
        booking.status = status;
        Ok(())
    }

    async fn list_confirmed(&self) -> Result<Vec<Booking>, StoreError> {
        Ok(self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| b.status == BookingStatus::Confirmed)
            .cloned()
            .collect())
    }
}
