//! Day and hour rules for when jobs may be booked.
//!
//! The business only takes work on weekends and holidays. Any Monday-Friday
//! that is not in the holiday table is closed; this is policy, not a gap.
//!
//! All checks are evaluated in the configured business timezone and never
//! fail: a window either passes or comes back with a [`PolicyViolation`]
//! whose message is shown to the customer as-is.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use thiserror::Error;

use crate::config::SchedulingConfig;
use crate::temporal::{clock_label, local_date, local_hour_instant, weekday_plural};

/// Why a requested window breaks the day/hour rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error(
        "We're closed on {}. We only accept bookings on weekends and holidays.",
        weekday_plural(*weekday)
    )]
    ClosedDay { date: NaiveDate, weekday: Weekday },

    #[error("We open at {}. Please choose a later start time.", clock_label(*opens))]
    BeforeOpening { opens: NaiveTime },

    #[error(
        "This job would run past our {} closing time. Please choose an earlier start time.",
        clock_label(*closes)
    )]
    PastClosing { closes: NaiveTime },
}

/// Business-rule checks over a borrowed [`SchedulingConfig`].
#[derive(Debug, Clone, Copy)]
pub struct BusinessRules<'a> {
    config: &'a SchedulingConfig,
}

impl<'a> BusinessRules<'a> {
    pub fn new(config: &'a SchedulingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a SchedulingConfig {
        self.config
    }

    /// True iff `date` is a Saturday, a Sunday, or a listed holiday.
    pub fn is_bookable_day(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun) || self.config.holidays.contains(date)
    }

    /// True iff the local hour of `instant` is in `[start_hour, end_hour)`.
    pub fn is_within_business_hours(&self, instant: DateTime<Utc>) -> bool {
        let local = instant.with_timezone(&self.config.time_zone);
        self.config.business_hours.contains_hour(local.hour())
    }

    /// Opening instant on a local date.
    pub fn opening_on(&self, date: NaiveDate) -> DateTime<Utc> {
        local_hour_instant(
            &self.config.time_zone,
            date,
            self.config.business_hours.start_hour,
        )
    }

    /// Closing instant on a local date.
    pub fn closing_on(&self, date: NaiveDate) -> DateTime<Utc> {
        local_hour_instant(
            &self.config.time_zone,
            date,
            self.config.business_hours.end_hour,
        )
    }

    /// Check a `[start, end)` job window against the day and hour rules.
    ///
    /// The start must be on a bookable day and inside business hours. The end
    /// may land exactly on closing time but not after it, and never on a later
    /// day than the start.
    pub fn validate_booking_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(), PolicyViolation> {
        let tz = &self.config.time_zone;
        let hours = &self.config.business_hours;
        let date = local_date(tz, start);

        if !self.is_bookable_day(date) {
            return Err(PolicyViolation::ClosedDay {
                date,
                weekday: date.weekday(),
            });
        }

        let closes = hour_label_time(hours.end_hour);
        let start_hour = start.with_timezone(tz).hour();
        if start_hour < hours.start_hour {
            return Err(PolicyViolation::BeforeOpening {
                opens: hour_label_time(hours.start_hour),
            });
        }
        if start_hour >= hours.end_hour || end > self.closing_on(date) {
            return Err(PolicyViolation::PastClosing { closes });
        }

        Ok(())
    }
}

fn hour_label_time(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour % 24, 0, 0).unwrap_or(NaiveTime::MIN)
}
