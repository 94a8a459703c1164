//! Reconcile a day's candidate slots against booked calendar intervals.
//!
//! A job occupies more time than the service itself: after every job there is
//! a fixed changeover buffer, and the crew may need travel time on top of that.
//! Both are additive. Only the service portion has to finish by closing time;
//! the trailing buffer may spill past it.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SchedulingConfig;
use crate::error::{Result, SchedulingError};
use crate::interval::{BookedInterval, TimeInterval};
use crate::rules::BusinessRules;
use crate::slots::{generate_day_slots, CandidateSlot, SlotUnavailable};
use crate::temporal::local_instant;

/// Longest service or travel time a single request may ask for.
pub const MAX_JOB_MINUTES: u32 = 24 * 60;

/// Reject request-supplied minute counts above [`MAX_JOB_MINUTES`].
///
/// # Errors
///
/// Returns [`SchedulingError::InvalidDuration`] naming `field`.
pub fn check_job_minutes(field: &str, minutes: u32) -> Result<u32> {
    if minutes > MAX_JOB_MINUTES {
        return Err(SchedulingError::InvalidDuration(format!(
            "{field} of {minutes} minutes exceeds the {MAX_JOB_MINUTES}-minute limit"
        )));
    }
    Ok(minutes)
}

/// The minutes a job blocks on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobDuration {
    pub service_minutes: u32,
    pub buffer_minutes: u32,
    pub travel_minutes: u32,
}

impl JobDuration {
    pub fn new(service_minutes: u32, buffer_minutes: u32, travel_minutes: u32) -> Self {
        Self {
            service_minutes,
            buffer_minutes,
            travel_minutes,
        }
    }

    /// Service + buffer + travel, summed in `i64` so no input can wrap.
    pub fn occupied_minutes(&self) -> i64 {
        i64::from(self.service_minutes)
            + i64::from(self.buffer_minutes)
            + i64::from(self.travel_minutes)
    }

    pub fn service_end(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        start + Duration::minutes(i64::from(self.service_minutes))
    }

    pub fn occupied_end(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        start + Duration::minutes(self.occupied_minutes())
    }
}

/// Standard half-open overlap test: `s < b.end && occupied_end > b.start`.
///
/// Unlike [`TimeInterval::overlaps`] this accepts a zero-length window, which
/// a zero-minute job with no buffer would produce.
pub fn window_conflicts(
    start: DateTime<Utc>,
    occupied_end: DateTime<Utc>,
    booked: &BookedInterval,
) -> bool {
    start < booked.end() && occupied_end > booked.start()
}

/// True if the occupied window starting at `start` overlaps any booked interval.
pub fn conflicts_with_any(
    start: DateTime<Utc>,
    job: &JobDuration,
    booked: &[BookedInterval],
) -> bool {
    let occupied_end = job.occupied_end(start);
    booked.iter().any(|b| window_conflicts(start, occupied_end, b))
}

/// Mark every grid slot on `date` available or unavailable.
///
/// Returns exactly one [`CandidateSlot`] per generated grid point, in time
/// order, regardless of how many booked intervals are supplied. A booking
/// conflict is reported in preference to a past-close violation.
pub fn compute_availability(
    config: &SchedulingConfig,
    date: NaiveDate,
    service_minutes: u32,
    travel_minutes: u32,
    booked: &[BookedInterval],
) -> Vec<CandidateSlot> {
    let job = JobDuration::new(service_minutes, config.buffer_minutes, travel_minutes);
    let closes = BusinessRules::new(config).closing_on(date);

    generate_day_slots(&config.business_hours, config.slot_granularity_minutes)
        .into_iter()
        .map(|time| {
            let start = local_instant(&config.time_zone, date, time);
            if conflicts_with_any(start, &job, booked) {
                CandidateSlot::unavailable(time, SlotUnavailable::ConflictsWithBooking)
            } else if job.service_end(start) > closes {
                CandidateSlot::unavailable(time, SlotUnavailable::ExtendsPastClose)
            } else {
                CandidateSlot::available(time)
            }
        })
        .collect()
}

/// The `[start, start + service)` interval of a slot on `date`, as reported
/// to API clients.
pub fn slot_interval(
    config: &SchedulingConfig,
    date: NaiveDate,
    slot: &CandidateSlot,
    service_minutes: u32,
) -> Option<TimeInterval> {
    let start = local_instant(&config.time_zone, date, slot.start_time);
    TimeInterval::starting_at(start, service_minutes).ok()
}
