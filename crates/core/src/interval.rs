//! Half-open time intervals `[start, end)` for reservation periods.

use crate::error::CoreError;
use crate::types::{Money, Timestamp};

/// A validated half-open interval: `start` is included, `end` is not.
///
/// Two intervals overlap iff `a.start < b.end && b.start < a.end`, so a
/// reservation ending exactly when another begins does not conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Interval {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Interval {
    /// Build an interval, rejecting `end <= start`.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, CoreError> {
        if end <= start {
            return Err(CoreError::InvalidInterval);
        }
        Ok(Self { start, end })
    }

    /// Half-open overlap test. Touching intervals are compatible.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Interval length in whole billed hours (ceiling of the duration).
    ///
    /// A 90-minute booking is billed as 2 hours, matching the tariff's
    /// whole-hour granularity.
    pub fn billed_hours(&self) -> i64 {
        let secs = (self.end - self.start).num_seconds();
        (secs + 3599) / 3600
    }

    /// Cost of this interval at the given hourly rate.
    pub fn cost(&self, hourly_rate: Money) -> Money {
        self.billed_hours() * hourly_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn at(hour: u32, min: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 10, 28, hour, min, 0).unwrap()
    }

    #[test]
    fn rejects_empty_and_inverted_intervals() {
        assert_matches!(
            Interval::new(at(10, 0), at(10, 0)),
            Err(CoreError::InvalidInterval)
        );
        assert_matches!(
            Interval::new(at(12, 0), at(10, 0)),
            Err(CoreError::InvalidInterval)
        );
    }

    #[test]
    fn overlapping_intervals_are_detected() {
        let a = Interval::new(at(10, 0), at(12, 0)).unwrap();
        let b = Interval::new(at(11, 0), at(13, 0)).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn contained_interval_overlaps() {
        let outer = Interval::new(at(9, 0), at(14, 0)).unwrap();
        let inner = Interval::new(at(10, 0), at(11, 0)).unwrap();
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        // One booking's exit equals another's entry: compatible.
        let a = Interval::new(at(10, 0), at(12, 0)).unwrap();
        let b = Interval::new(at(12, 0), at(14, 0)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        let a = Interval::new(at(8, 0), at(9, 0)).unwrap();
        let b = Interval::new(at(12, 0), at(14, 0)).unwrap();
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn whole_hours_bill_exactly() {
        let two_hours = Interval::new(at(10, 0), at(12, 0)).unwrap();
        assert_eq!(two_hours.billed_hours(), 2);
        assert_eq!(two_hours.cost(30), 60);
    }

    #[test]
    fn partial_hours_round_up() {
        let ninety_min = Interval::new(at(10, 0), at(11, 30)).unwrap();
        assert_eq!(ninety_min.billed_hours(), 2);
        assert_eq!(ninety_min.cost(20), 40);
    }
}
