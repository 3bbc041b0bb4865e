use crate::availability::{find_conflict, intersects_blocked, materialize_blocked_dates};
use crate::error::LedgerError;
use chrono::{NaiveDate, Utc};
use drive_domain::{
    Booking, BookingStatus, BookingStore, Car, CatalogStore, Notifier, RentalPeriod, StoreError,
};
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};
use tracing::{info, warn};
use uuid::Uuid;

/// Timeout and retry policy for store calls.
#[derive(Debug, Clone)]
pub struct LedgerPolicy {
    /// Upper bound on any single store call.
    pub store_timeout: Duration,
    /// Extra attempts for read-only store calls after a transient failure.
    pub read_retries: u32,
    /// Base backoff between read retries, multiplied by the attempt number.
    pub retry_backoff: Duration,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(10),
            read_retries: 2,
            retry_backoff: Duration::from_millis(100),
        }
    }
}

/// Owns authoritative availability state for every listed car.
///
/// All booking and blocked-date writes go through here. Mutations on one
/// car are serialized by a per-car mutex so the availability re-check and
/// the booking insert commit as one unit; different cars never contend.
/// `is_available` reads outside the lock and returns a snapshot that may
/// be stale by the time the caller acts on it — `reserve` re-validates.
pub struct AvailabilityLedger {
    catalog: Arc<dyn CatalogStore>,
    bookings: Arc<dyn BookingStore>,
    notifier: Arc<dyn Notifier>,
    policy: LedgerPolicy,
    car_locks: StdMutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl AvailabilityLedger {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        bookings: Arc<dyn BookingStore>,
        notifier: Arc<dyn Notifier>,
        policy: LedgerPolicy,
    ) -> Self {
        Self {
            catalog,
            bookings,
            notifier,
            policy,
            car_locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Whether the car is free for `[start, end)`. Pure query.
    pub async fn is_available(
        &self,
        car_id: Uuid,
        start: &str,
        end: &str,
    ) -> Result<bool, LedgerError> {
        let period = RentalPeriod::parse(start, end)?;
        let today = Utc::now().date_naive();
        if period.start < today {
            // Past dates are never bookable, including ranges entirely elapsed.
            return Ok(false);
        }

        let car = self.require_car(car_id).await?;
        if intersects_blocked(&period, &car.blocked_dates) {
            return Ok(false);
        }

        let active = self
            .read_op("list active bookings", || self.bookings.list_active(car_id))
            .await?;
        Ok(find_conflict(&active, &period).is_none())
    }

    /// Reserve `[start, end)` for `renter_id`, atomically with respect to
    /// concurrent attempts on the same car.
    pub async fn reserve(
        &self,
        car_id: Uuid,
        renter_id: &str,
        start: &str,
        end: &str,
    ) -> Result<Booking, LedgerError> {
        let period = RentalPeriod::parse(start, end)?;
        let today = Utc::now().date_naive();
        if period.start < today {
            return Err(LedgerError::Validation(format!(
                "rental start {} is in the past",
                period.start
            )));
        }

        let lock = self.car_lock(car_id);
        let _guard = lock.lock().await;

        let car = self.require_car(car_id).await?;
        if car.is_owned_by(renter_id) {
            return Err(LedgerError::Validation(
                "owners cannot book their own car".to_string(),
            ));
        }

        // The availability check must hold at the instant of commit, not at
        // whatever point the caller last queried.
        let active = self
            .read_op("list active bookings", || self.bookings.list_active(car_id))
            .await?;
        if let Some(existing) = find_conflict(&active, &period) {
            return Err(LedgerError::Conflict {
                car_id,
                period: existing.period,
            });
        }
        if intersects_blocked(&period, &materialize_blocked_dates(&active, &car.manual_blocks)) {
            return Err(LedgerError::Conflict { car_id, period });
        }

        let total_price = period.days().checked_mul(car.price_per_day).ok_or_else(|| {
            LedgerError::Validation(format!(
                "total price for {} days at {} per day overflows",
                period.days(),
                car.price_per_day
            ))
        })?;
        let booking = Booking::new(
            car_id,
            car.owner_id.clone(),
            renter_id.to_string(),
            period,
            total_price,
            BookingStatus::Confirmed,
        );

        self.write_op("insert booking", self.bookings.insert_booking(&booking))
            .await?;

        let mut all_active = active;
        all_active.push(booking.clone());
        if let Err(err) = self.write_blocked_dates(&car, &all_active).await {
            // Compensate so the stores never disagree: without the derived
            // dates the booking must not stand either.
            warn!(booking_id = %booking.id, error = %err, "rolling back booking after blocked-dates write failure");
            let _ = self
                .write_op(
                    "cancel booking",
                    self.bookings.update_status(booking.id, BookingStatus::Cancelled),
                )
                .await;
            return Err(err);
        }
        drop(_guard);

        info!(booking_id = %booking.id, car_id = %car_id, period = %booking.period, "booking confirmed");
        self.notify_owner(&car, &booking).await;

        Ok(booking)
    }

    /// Cancel a booking. Only the renter or the car's owner may do this.
    pub async fn cancel(&self, booking_id: Uuid, actor_id: &str) -> Result<(), LedgerError> {
        let booking = self
            .read_op("get booking", || self.bookings.get_booking(booking_id))
            .await?
            .ok_or_else(|| LedgerError::Validation(format!("unknown booking {booking_id}")))?;

        if booking.renter_id != actor_id && booking.owner_id != actor_id {
            return Err(LedgerError::Authorization(format!(
                "{actor_id} is neither the renter nor the owner of booking {booking_id}"
            )));
        }

        let lock = self.car_lock(booking.car_id);
        let _guard = lock.lock().await;

        // Re-read under the lock; the status may have moved since.
        let mut booking = self
            .read_op("get booking", || self.bookings.get_booking(booking_id))
            .await?
            .ok_or_else(|| LedgerError::Validation(format!("unknown booking {booking_id}")))?;
        booking
            .transition(BookingStatus::Cancelled)
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.write_op(
            "update booking status",
            self.bookings.update_status(booking_id, BookingStatus::Cancelled),
        )
        .await?;

        // Recompute rather than subtract: another active booking or a manual
        // block may still cover some of the freed dates.
        match self.require_car(booking.car_id).await {
            Ok(car) => {
                let active = self
                    .read_op("list active bookings", || {
                        self.bookings.list_active(booking.car_id)
                    })
                    .await?;
                self.write_blocked_dates(&car, &active).await?;
            }
            Err(LedgerError::Validation(_)) => {
                warn!(booking_id = %booking_id, "cancelled booking for a delisted car");
            }
            Err(err) => return Err(err),
        }

        info!(booking_id = %booking_id, actor = %actor_id, "booking cancelled");
        Ok(())
    }

    /// Owner adds manual blocks. Returns the rematerialized blocked set.
    pub async fn block_dates(
        &self,
        car_id: Uuid,
        actor_id: &str,
        dates: &[String],
    ) -> Result<BTreeSet<NaiveDate>, LedgerError> {
        let parsed = parse_dates(dates)?;
        self.update_manual_blocks(car_id, actor_id, |blocks| blocks.extend(parsed.clone()))
            .await
    }

    /// Owner removes manual blocks. Dates still covered by an active booking
    /// remain in the blocked set.
    pub async fn unblock_dates(
        &self,
        car_id: Uuid,
        actor_id: &str,
        dates: &[String],
    ) -> Result<BTreeSet<NaiveDate>, LedgerError> {
        let parsed = parse_dates(dates)?;
        self.update_manual_blocks(car_id, actor_id, |blocks| {
            blocks.retain(|d| !parsed.contains(d))
        })
        .await
    }

    async fn update_manual_blocks(
        &self,
        car_id: Uuid,
        actor_id: &str,
        apply: impl FnOnce(&mut BTreeSet<NaiveDate>),
    ) -> Result<BTreeSet<NaiveDate>, LedgerError> {
        let lock = self.car_lock(car_id);
        let _guard = lock.lock().await;

        let mut car = self.require_car(car_id).await?;
        if !car.is_owned_by(actor_id) {
            return Err(LedgerError::Authorization(format!(
                "{actor_id} does not own car {car_id}"
            )));
        }

        apply(&mut car.manual_blocks);
        let active = self
            .read_op("list active bookings", || self.bookings.list_active(car_id))
            .await?;
        let blocked = materialize_blocked_dates(&active, &car.manual_blocks);
        self.write_op(
            "set availability",
            self.catalog
                .set_availability(car_id, car.manual_blocks.clone(), blocked.clone()),
        )
        .await?;

        Ok(blocked)
    }

    pub(crate) async fn require_car(&self, car_id: Uuid) -> Result<Car, LedgerError> {
        self.read_op("get car", || self.catalog.get_car(car_id))
            .await?
            .ok_or_else(|| LedgerError::Validation(format!("unknown car {car_id}")))
    }

    pub(crate) async fn write_blocked_dates(
        &self,
        car: &Car,
        active: &[Booking],
    ) -> Result<(), LedgerError> {
        let blocked = materialize_blocked_dates(active, &car.manual_blocks);
        self.write_op(
            "set availability",
            self.catalog
                .set_availability(car.id, car.manual_blocks.clone(), blocked),
        )
        .await
    }

    pub(crate) fn car_lock(&self, car_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.car_locks.lock().expect("car lock registry poisoned");
        locks.entry(car_id).or_default().clone()
    }

    pub(crate) fn bookings(&self) -> &Arc<dyn BookingStore> {
        &self.bookings
    }

    async fn notify_owner(&self, car: &Car, booking: &Booking) {
        let message = format!(
            "I've booked your {} from {} to {}. Booking reference: {}",
            car.model, booking.period.start, booking.period.end, booking.id
        );
        // Fire-and-forget: a failed notification never rolls back a booking.
        if let Err(err) = timeout(
            self.policy.store_timeout,
            self.notifier.notify(&car.owner_id, &message, car.id),
        )
        .await
        .unwrap_or_else(|_| Err(StoreError::Unavailable("notify timed out".to_string())))
        {
            warn!(booking_id = %booking.id, error = %err, "owner notification failed");
        }
    }

    /// Read-only store call with a bounded timeout and bounded retries.
    pub(crate) async fn read_op<T, Fut>(
        &self,
        what: &str,
        mut op: impl FnMut() -> Fut,
    ) -> Result<T, LedgerError>
    where
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            let outcome = match timeout(self.policy.store_timeout, op()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(StoreError::NotFound(missing))) => {
                    return Err(LedgerError::Validation(format!("unknown {missing}")))
                }
                Ok(Err(StoreError::Unavailable(why))) => why,
                Err(_) => format!("{what} timed out"),
            };

            if attempt >= self.policy.read_retries {
                return Err(LedgerError::Transient(outcome));
            }
            attempt += 1;
            warn!(op = what, attempt, error = %outcome, "transient store failure, retrying");
            sleep(self.policy.retry_backoff * attempt).await;
        }
    }

    /// Mutating store call: one attempt, bounded timeout, never auto-retried.
    pub(crate) async fn write_op<Fut>(&self, what: &str, op: Fut) -> Result<(), LedgerError>
    where
        Fut: Future<Output = Result<(), StoreError>>,
    {
        match timeout(self.policy.store_timeout, op).await {
            Ok(result) => result.map_err(LedgerError::from),
            Err(_) => Err(LedgerError::Transient(format!("{what} timed out"))),
        }
    }
}

fn parse_dates(dates: &[String]) -> Result<BTreeSet<NaiveDate>, LedgerError> {
    dates
        .iter()
        .map(|d| drive_domain::period::parse_date(d).map_err(LedgerError::from))
        .collect()
}
