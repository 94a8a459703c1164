//! The per-day grid of candidate start times.

use chrono::{Duration, NaiveTime};
use serde::Serialize;

use crate::config::BusinessHours;
use crate::temporal::clock_label;

/// Why a candidate slot cannot be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotUnavailable {
    ConflictsWithBooking,
    ExtendsPastClose,
}

impl std::fmt::Display for SlotUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConflictsWithBooking => f.write_str("Conflicts with existing booking"),
            Self::ExtendsPastClose => f.write_str("Service would extend past close"),
        }
    }
}

/// A generated start time and whether it can be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateSlot {
    pub start_time: NaiveTime,
    /// Display form of `start_time`, e.g. "9:00 AM".
    pub label: String,
    pub available: bool,
    pub reason: Option<SlotUnavailable>,
}

impl CandidateSlot {
    pub fn available(start_time: NaiveTime) -> Self {
        Self {
            start_time,
            label: clock_label(start_time),
            available: true,
            reason: None,
        }
    }

    pub fn unavailable(start_time: NaiveTime, reason: SlotUnavailable) -> Self {
        Self {
            start_time,
            label: clock_label(start_time),
            available: false,
            reason: Some(reason),
        }
    }
}

/// Ascending start times in `[start_hour, end_hour)` every `granularity_minutes`.
///
/// A granularity of zero yields no slots.
pub fn generate_day_slots(hours: &BusinessHours, granularity_minutes: u32) -> Vec<NaiveTime> {
    if granularity_minutes == 0 {
        return Vec::new();
    }
    let open = hours.start_hour * 60;
    let close = hours.end_hour.min(24) * 60;
    (open..close)
        .step_by(granularity_minutes as usize)
        .map(|minute| NaiveTime::MIN + Duration::minutes(minute as i64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn hourly_grid_covers_half_open_range() {
        let slots = generate_day_slots(&BusinessHours::new(7, 18).unwrap(), 60);
        assert_eq!(slots.len(), 11);
        assert_eq!(slots.first(), Some(&t(7, 0)));
        assert_eq!(slots.last(), Some(&t(17, 0)));
    }

    #[test]
    fn half_hour_grid() {
        let slots = generate_day_slots(&BusinessHours::new(9, 11).unwrap(), 30);
        assert_eq!(slots, vec![t(9, 0), t(9, 30), t(10, 0), t(10, 30)]);
    }

    #[test]
    fn uneven_granularity_stops_before_close() {
        let slots = generate_day_slots(&BusinessHours::new(9, 10).unwrap(), 45);
        assert_eq!(slots, vec![t(9, 0), t(9, 45)]);
    }

    #[test]
    fn midnight_close_keeps_last_slot_same_day() {
        let slots = generate_day_slots(&BusinessHours::new(22, 24).unwrap(), 60);
        assert_eq!(slots, vec![t(22, 0), t(23, 0)]);
    }

    #[test]
    fn zero_granularity_is_empty() {
        assert!(generate_day_slots(&BusinessHours::default(), 0).is_empty());
    }
}
