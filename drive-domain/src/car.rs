use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Pickup coordinate for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickupLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// A listed vehicle.
///
/// `blocked_dates` is a derived cache: the union of every date covered by
/// an active booking plus the owner's `manual_blocks`. Booking records are
/// the source of truth; only the availability ledger rewrites either set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    pub id: Uuid,
    pub model: String,
    pub year: i32,
    pub mileage: i32,
    /// Daily rate in the smallest currency unit.
    pub price_per_day: i64,
    pub pickup_location: PickupLocation,
    pub owner_id: String,
    pub manual_blocks: BTreeSet<NaiveDate>,
    pub blocked_dates: BTreeSet<NaiveDate>,
}

impl Car {
    pub fn new(
        model: String,
        year: i32,
        mileage: i32,
        price_per_day: i64,
        pickup_location: PickupLocation,
        owner_id: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            model,
            year,
            mileage,
            price_per_day,
            pickup_location,
            owner_id,
            manual_blocks: BTreeSet::new(),
            blocked_dates: BTreeSet::new(),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}
