//! End-to-end validation of a requested booking.
//!
//! Rejections are values, never errors: a [`ValidationResult::Invalid`]
//! carries the customer-facing reason and up to `max_suggestions`
//! alternatives. Calendar outages are reported through
//! [`SchedulingError`](crate::error::SchedulingError) by the caller that
//! fetched the booked intervals, never folded into a rejection.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConflictPolicy, SchedulingConfig};
use crate::conflict::{check_job_minutes, JobDuration};
use crate::error::{Result, SchedulingError};
use crate::interval::{find_conflicts, BookedInterval, Conflict, TimeInterval};
use crate::rules::{BusinessRules, PolicyViolation};
use crate::suggest::{AlternativeSuggester, Suggestion};

/// A customer's requested start and the job length computed from their cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub requested_start: DateTime<Utc>,
    /// Zone the customer sees labels in.
    pub time_zone: Tz,
    pub duration_minutes: u32,
}

impl BookingRequest {
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidDuration`] when `duration_minutes` is
    /// zero or above [`MAX_JOB_MINUTES`](crate::conflict::MAX_JOB_MINUTES).
    pub fn new(
        requested_start: DateTime<Utc>,
        time_zone: Tz,
        duration_minutes: u32,
    ) -> Result<Self> {
        if duration_minutes == 0 {
            return Err(SchedulingError::InvalidDuration(
                "duration must be greater than zero minutes".to_string(),
            ));
        }
        check_job_minutes("duration", duration_minutes)?;
        Ok(Self {
            requested_start,
            time_zone,
            duration_minutes,
        })
    }

    /// `[requested_start, requested_start + duration)`.
    pub fn window(&self) -> Result<TimeInterval> {
        TimeInterval::starting_at(self.requested_start, self.duration_minutes)
    }
}

/// Why a booking was refused.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    #[error("That time overlaps an existing booking. Please choose another time.")]
    Conflict { conflicts: Vec<Conflict> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid,
    Invalid {
        reason: Rejection,
        suggestions: Vec<Suggestion>,
    },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

pub struct BookingValidator<'a> {
    config: &'a SchedulingConfig,
}

impl<'a> BookingValidator<'a> {
    pub fn new(config: &'a SchedulingConfig) -> Self {
        Self { config }
    }

    /// Validate `request` against the day/hour rules and, when the configured
    /// [`ConflictPolicy`] is `RejectConflicts`, against `booked`.
    ///
    /// With the default `AllowDoubleBooking` policy `booked` is only used by
    /// conflict-aware suggestions; overlapping requests are accepted.
    pub fn validate(
        &self,
        request: &BookingRequest,
        booked: &[BookedInterval],
    ) -> Result<ValidationResult> {
        let window = request.window()?;
        let rules = BusinessRules::new(self.config);

        if let Err(violation) = rules.validate_booking_window(window.start(), window.end()) {
            return Ok(self.reject(request, &window, booked, violation.into()));
        }

        if self.config.conflict_policy == ConflictPolicy::RejectConflicts {
            let job = JobDuration::new(request.duration_minutes, self.config.buffer_minutes, 0);
            let occupied = TimeInterval::new(window.start(), job.occupied_end(window.start()))?;
            let conflicts = find_conflicts(&occupied, booked);
            if !conflicts.is_empty() {
                let reason = Rejection::Conflict { conflicts };
                return Ok(self.reject(request, &window, booked, reason));
            }
        }

        Ok(ValidationResult::Valid)
    }

    fn reject(
        &self,
        request: &BookingRequest,
        window: &TimeInterval,
        booked: &[BookedInterval],
        reason: Rejection,
    ) -> ValidationResult {
        let suggestions = AlternativeSuggester::new(BusinessRules::new(self.config))
            .with_display_timezone(request.time_zone)
            .with_booked(booked)
            .suggest(window, self.config.suggestions.max_suggestions);
        ValidationResult::Invalid {
            reason,
            suggestions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::MAX_JOB_MINUTES;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn zero_duration_is_an_input_error() {
        let err = BookingRequest::new(utc("2026-03-21T09:00:00Z"), chrono_tz::UTC, 0).unwrap_err();
        assert!(err.to_string().contains("Invalid duration"), "got: {err}");
    }

    #[test]
    fn duration_longer_than_a_day_is_an_input_error() {
        let start = utc("2026-03-21T09:00:00Z");
        assert!(BookingRequest::new(start, chrono_tz::UTC, MAX_JOB_MINUTES).is_ok());
        for minutes in [MAX_JOB_MINUTES + 1, u32::MAX] {
            let err = BookingRequest::new(start, chrono_tz::UTC, minutes).unwrap_err();
            assert!(matches!(err, SchedulingError::InvalidDuration(_)), "got: {err}");
        }
    }

    #[test]
    fn rejection_message_passes_policy_text_through() {
        let reason: Rejection = PolicyViolation::BeforeOpening {
            opens: chrono::NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
        }
        .into();
        assert_eq!(reason.to_string(), "We open at 7:00 AM. Please choose a later start time.");
    }
}
