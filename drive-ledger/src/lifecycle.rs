use crate::error::LedgerError;
use crate::ledger::AvailabilityLedger;
use chrono::NaiveDate;
use drive_domain::BookingStatus;
use tracing::{info, warn};

impl AvailabilityLedger {
    /// Sweep confirmed bookings whose rental period has fully elapsed into
    /// `Completed`, freeing their dates from the derived blocked set.
    ///
    /// System-driven only; run from a background worker, never by users.
    /// Returns how many bookings were completed.
    pub async fn complete_elapsed(&self, today: NaiveDate) -> Result<usize, LedgerError> {
        let confirmed = self
            .read_op("list confirmed bookings", || self.bookings().list_confirmed())
            .await?;

        let mut completed = 0usize;
        for booking in confirmed {
            if !booking.period.has_elapsed(today) {
                continue;
            }

            let lock = self.car_lock(booking.car_id);
            let _guard = lock.lock().await;

            // The snapshot is stale by now; only a still-confirmed booking
            // may move to Completed. A cancel that raced us wins.
            let Some(mut current) = self
                .read_op("get booking", || self.bookings().get_booking(booking.id))
                .await?
            else {
                continue;
            };
            if current.transition(BookingStatus::Completed).is_err() {
                continue;
            }

            self.write_op(
                "update booking status",
                self.bookings()
                    .update_status(booking.id, BookingStatus::Completed),
            )
            .await?;
            completed += 1;

            match self.require_car(booking.car_id).await {
                Ok(car) => {
                    let active = self
                        .read_op("list active bookings", || {
                            self.bookings().list_active(booking.car_id)
                        })
                        .await?;
                    self.write_blocked_dates(&car, &active).await?;
                }
                Err(LedgerError::Validation(_)) => {
                    warn!(booking_id = %booking.id, "completed booking for a delisted car");
                }
                Err(err) => return Err(err),
            }

            info!(booking_id = %booking.id, car_id = %booking.car_id, "booking completed");
        }

        Ok(completed)
    }
}
