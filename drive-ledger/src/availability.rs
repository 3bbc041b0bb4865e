use chrono::NaiveDate;
use drive_domain::{Booking, RentalPeriod};
use std::collections::BTreeSet;

/// First active booking whose period overlaps the requested one.
///
/// Terminal bookings are skipped; a cancelled reservation frees its dates.
pub fn find_conflict<'a>(bookings: &'a [Booking], period: &RentalPeriod) -> Option<&'a Booking> {
    bookings
        .iter()
        .filter(|b| b.is_active())
        .find(|b| b.period.overlaps(period))
}

/// Rebuild a car's blocked-date set from scratch.
///
/// Union of every date covered by an active booking plus the owner's manual
/// blocks. Always recomputed in full so that cancelling one booking never
/// frees a date another booking or a manual block still covers.
pub fn materialize_blocked_dates(
    bookings: &[Booking],
    manual_blocks: &BTreeSet<NaiveDate>,
) -> BTreeSet<NaiveDate> {
    let mut blocked = manual_blocks.clone();
    for booking in bookings.iter().filter(|b| b.is_active()) {
        blocked.extend(booking.period.dates());
    }
    blocked
}

/// Whether any covered date falls in the blocked set.
pub fn intersects_blocked(period: &RentalPeriod, blocked: &BTreeSet<NaiveDate>) -> bool {
    blocked.range(period.start..period.end).next().is_some()
}
