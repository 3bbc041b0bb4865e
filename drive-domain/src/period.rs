use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open range of calendar days: `[start, end)`.
///
/// The end date is the drop-off day and is not occupied, so a booking
/// ending on the 12th and another starting on the 12th do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PeriodError {
    #[error("malformed date '{0}', expected YYYY-MM-DD")]
    MalformedDate(String),

    #[error("end date {end} must be after start date {start}")]
    EmptyRange { start: NaiveDate, end: NaiveDate },
}

impl RentalPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if end <= start {
            return Err(PeriodError::EmptyRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse a period from the ISO-8601 date strings used at the API boundary.
    pub fn parse(start: &str, end: &str) -> Result<Self, PeriodError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn overlaps(&self, other: &RentalPeriod) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Number of occupied (billable) days.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// True once the drop-off day has been reached.
    pub fn has_elapsed(&self, today: NaiveDate) -> bool {
        self.end <= today
    }

    /// Iterator over every occupied date, end exclusive.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let end = self.end;
        std::iter::successors(Some(self.start), move |d| {
            d.checked_add_days(Days::new(1)).filter(|next| *next < end)
        })
    }
}

impl fmt::Display for RentalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate, PeriodError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| PeriodError::MalformedDate(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_parse_valid_period() {
        let period = RentalPeriod::parse("2025-06-10", "2025-06-12").unwrap();
        assert_eq!(period.start, date("2025-06-10"));
        assert_eq!(period.days(), 2);
    }

    #[test]
    fn test_rejects_malformed_date() {
        let err = RentalPeriod::parse("June 10, 2025", "2025-06-12").unwrap_err();
        assert!(matches!(err, PeriodError::MalformedDate(_)));
    }

    #[test]
    fn test_rejects_empty_and_inverted_ranges() {
        assert!(matches!(
            RentalPeriod::parse("2025-06-10", "2025-06-10"),
            Err(PeriodError::EmptyRange { .. })
        ));
        assert!(matches!(
            RentalPeriod::parse("2025-06-12", "2025-06-10"),
            Err(PeriodError::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_overlap_is_half_open() {
        let booked = RentalPeriod::parse("2025-06-10", "2025-06-12").unwrap();

        // Shares the 11th.
        let overlapping = RentalPeriod::parse("2025-06-11", "2025-06-13").unwrap();
        assert!(booked.overlaps(&overlapping));

        // Starts on the drop-off day: back-to-back, no overlap.
        let adjacent = RentalPeriod::parse("2025-06-12", "2025-06-15").unwrap();
        assert!(!booked.overlaps(&adjacent));
        assert!(!adjacent.overlaps(&booked));
    }

    #[test]
    fn test_dates_excludes_end() {
        let period = RentalPeriod::parse("2025-06-10", "2025-06-12").unwrap();
        let covered: Vec<_> = period.dates().collect();
        assert_eq!(covered, vec![date("2025-06-10"), date("2025-06-11")]);
    }

    #[test]
    fn test_contains() {
        let period = RentalPeriod::parse("2025-06-10", "2025-06-12").unwrap();
        assert!(period.contains(date("2025-06-10")));
        assert!(period.contains(date("2025-06-11")));
        assert!(!period.contains(date("2025-06-12")));
    }

    #[test]
    fn test_has_elapsed() {
        let period = RentalPeriod::parse("2025-06-10", "2025-06-12").unwrap();
        assert!(!period.has_elapsed(date("2025-06-11")));
        assert!(period.has_elapsed(date("2025-06-12")));
    }
}
