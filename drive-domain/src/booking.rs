use crate::period::RentalPeriod;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Active bookings count toward overlap checks; terminal ones do not.
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }
}

/// A reservation of one car for one rental period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub car_id: Uuid,
    pub owner_id: String,
    pub renter_id: String,
    pub period: RentalPeriod,
    pub total_price: i64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        car_id: Uuid,
        owner_id: String,
        renter_id: String,
        period: RentalPeriod,
        total_price: i64,
        status: BookingStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            car_id,
            owner_id,
            renter_id,
            period,
            total_price,
            status,
            created_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Guarded status transition.
    ///
    /// Allowed: Pending -> Confirmed -> Completed, and Pending/Confirmed ->
    /// Cancelled. Nothing leaves a terminal state.
    pub fn transition(&mut self, next: BookingStatus) -> Result<(), InvalidTransition> {
        use BookingStatus::*;
        let allowed = matches!(
            (self.status, next),
            (Pending, Confirmed) | (Confirmed, Completed) | (Pending, Cancelled) | (Confirmed, Cancelled)
        );
        if !allowed {
            return Err(InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid booking transition from {} to {}", from.as_str(), to.as_str())]
pub struct InvalidTransition {
    pub from: BookingStatus,
    pub to: BookingStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(status: BookingStatus) -> Booking {
        Booking::new(
            Uuid::new_v4(),
            "owner@example.com".to_string(),
            "renter@example.com".to_string(),
            RentalPeriod::parse("2030-01-10", "2030-01-12").unwrap(),
            9000,
            status,
        )
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut b = booking(BookingStatus::Pending);
        b.transition(BookingStatus::Confirmed).unwrap();
        b.transition(BookingStatus::Completed).unwrap();
        assert_eq!(b.status, BookingStatus::Completed);
    }

    #[test]
    fn test_cancel_from_active_states() {
        let mut pending = booking(BookingStatus::Pending);
        pending.transition(BookingStatus::Cancelled).unwrap();

        let mut confirmed = booking(BookingStatus::Confirmed);
        confirmed.transition(BookingStatus::Cancelled).unwrap();
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut completed = booking(BookingStatus::Completed);
        assert!(completed.transition(BookingStatus::Cancelled).is_err());

        let mut cancelled = booking(BookingStatus::Cancelled);
        assert!(cancelled.transition(BookingStatus::Confirmed).is_err());
    }

    #[test]
    fn test_no_skipping_confirmation() {
        let mut pending = booking(BookingStatus::Pending);
        assert!(pending.transition(BookingStatus::Completed).is_err());
    }

    #[test]
    fn test_active_statuses() {
        assert!(BookingStatus::Pending.is_active());
        assert!(BookingStatus::Confirmed.is_active());
        assert!(!BookingStatus::Completed.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
    }
}
