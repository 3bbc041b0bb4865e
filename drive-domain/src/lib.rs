pub mod booking;
pub mod car;
pub mod events;
pub mod period;
pub mod repository;

pub use booking::{Booking, BookingStatus, InvalidTransition};
pub use car::{Car, PickupLocation};
pub use events::Notification;
pub use period::{PeriodError, RentalPeriod};
pub use repository::{BookingStore, CatalogStore, Notifier, StoreError};
