//! Half-open time intervals and the booked periods read from the calendar.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SchedulingError;

/// A half-open `[start, end)` span of time in UTC.
///
/// The invariant `start < end` is enforced at construction; fields are
/// private so an interval cannot be mutated into an invalid state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeInterval {
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidInterval`] unless `start < end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, SchedulingError> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(SchedulingError::InvalidInterval(format!(
                "start {} must be before end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            )))
        }
    }

    /// An interval of `minutes` starting at `start`.
    pub fn starting_at(start: DateTime<Utc>, minutes: u32) -> Result<Self, SchedulingError> {
        Self::new(start, start + Duration::minutes(minutes as i64))
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Two intervals overlap iff `a.start < b.end && b.start < a.end`.
    ///
    /// Adjacent intervals (one ends exactly when the other starts) do NOT overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Minutes shared by both intervals, zero when they do not overlap.
    pub fn overlap_minutes(&self, other: &TimeInterval) -> i64 {
        if !self.overlaps(other) {
            return 0;
        }
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (end - start).num_minutes()
    }
}

impl<'de> Deserialize<'de> for TimeInterval {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        }

        let raw = Raw::deserialize(deserializer)?;
        TimeInterval::new(raw.start, raw.end).map_err(serde::de::Error::custom)
    }
}

/// A busy period already committed on the external calendar.
///
/// Snapshots are fetched per request and never cached: the calendar can change
/// between a page load and a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedInterval {
    #[serde(flatten)]
    pub interval: TimeInterval,
    /// Summary of the source calendar event.
    #[serde(default)]
    pub label: String,
}

impl BookedInterval {
    pub fn new(interval: TimeInterval, label: impl Into<String>) -> Self {
        Self {
            interval,
            label: label.into(),
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.interval.start()
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.interval.end()
    }
}

/// A booked interval that overlaps a requested window.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub booked: BookedInterval,
    pub overlap_minutes: i64,
}

/// Find every booked interval that overlaps `window`, in input order.
pub fn find_conflicts(window: &TimeInterval, booked: &[BookedInterval]) -> Vec<Conflict> {
    booked
        .iter()
        .filter(|b| window.overlaps(&b.interval))
        .map(|b| Conflict {
            booked: b.clone(),
            overlap_minutes: window.overlap_minutes(&b.interval),
        })
        .collect()
}
