//! Forward search for alternative start times after a rejection.
//!
//! Search order:
//!
//! 1. the requested start plus one hour, same day;
//! 2. the requested start plus two hours, same day;
//! 3. opening time on each following calendar day, up to
//!    [`SuggestionPolicy::search_days`](crate::config::SuggestionPolicy) days.
//!
//! A candidate is kept only if it passes the day/hour rules for the full job
//! length. Booked intervals are not consulted unless
//! `suggestions.avoid_conflicts` is on and a snapshot was supplied; in that
//! mode each following day is scanned along the slot grid for the first
//! conflict-free start instead of trying opening time only.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::trace;

use crate::conflict::{conflicts_with_any, JobDuration};
use crate::interval::{BookedInterval, TimeInterval};
use crate::rules::BusinessRules;
use crate::slots::generate_day_slots;
use crate::temporal::{day_label, local_date, local_instant, time_range_label};

/// A proposed alternative start time with display labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// e.g. "Saturday, March 21"
    pub day_label: String,
    /// e.g. "9:00 AM - 10:00 AM"
    pub time_range_label: String,
}

pub struct AlternativeSuggester<'a> {
    rules: BusinessRules<'a>,
    display_tz: Tz,
    booked: &'a [BookedInterval],
}

impl<'a> AlternativeSuggester<'a> {
    /// Labels are rendered in the business timezone unless overridden.
    pub fn new(rules: BusinessRules<'a>) -> Self {
        Self {
            display_tz: rules.config().time_zone,
            rules,
            booked: &[],
        }
    }

    pub fn with_display_timezone(mut self, tz: Tz) -> Self {
        self.display_tz = tz;
        self
    }

    /// Booked intervals to avoid when conflict-aware suggestions are enabled.
    pub fn with_booked(mut self, booked: &'a [BookedInterval]) -> Self {
        self.booked = booked;
        self
    }

    /// Up to `max_suggestions` valid alternatives for `requested`, in search order.
    ///
    /// An empty result means nothing was found within the search budget; it
    /// is a normal outcome, not an error.
    pub fn suggest(&self, requested: &TimeInterval, max_suggestions: usize) -> Vec<Suggestion> {
        let config = self.rules.config();
        let tz = &config.time_zone;
        let duration_minutes = requested.duration_minutes().max(0) as u32;
        let requested_date = local_date(tz, requested.start());

        let mut found = Vec::new();
        if max_suggestions == 0 {
            return found;
        }

        for hours in [1, 2] {
            let candidate = requested.start() + Duration::hours(hours);
            if local_date(tz, candidate) == requested_date
                && self.accepts(candidate, duration_minutes)
            {
                found.push(self.suggestion(candidate, duration_minutes));
                if found.len() >= max_suggestions {
                    return found;
                }
            }
        }

        for day in 1..=config.suggestions.search_days {
            let Some(date) = requested_date.checked_add_days(chrono::Days::new(day as u64)) else {
                break;
            };
            if let Some(candidate) = self.first_on_day(date, duration_minutes) {
                found.push(self.suggestion(candidate, duration_minutes));
                if found.len() >= max_suggestions {
                    break;
                }
            }
        }

        trace!(
            requested = %requested.start(),
            found = found.len(),
            "alternative search finished"
        );
        found
    }

    fn checks_conflicts(&self) -> bool {
        self.rules.config().suggestions.avoid_conflicts && !self.booked.is_empty()
    }

    fn first_on_day(&self, date: NaiveDate, duration_minutes: u32) -> Option<DateTime<Utc>> {
        if !self.rules.is_bookable_day(date) {
            return None;
        }
        if !self.checks_conflicts() {
            let opening = self.rules.opening_on(date);
            return self.accepts(opening, duration_minutes).then_some(opening);
        }
        let config = self.rules.config();
        generate_day_slots(&config.business_hours, config.slot_granularity_minutes)
            .into_iter()
            .map(|time| local_instant(&config.time_zone, date, time))
            .find(|candidate| self.accepts(*candidate, duration_minutes))
    }

    fn accepts(&self, start: DateTime<Utc>, duration_minutes: u32) -> bool {
        let end = start + Duration::minutes(duration_minutes as i64);
        if self.rules.validate_booking_window(start, end).is_err() {
            return false;
        }
        if self.checks_conflicts() {
            let job = JobDuration::new(duration_minutes, self.rules.config().buffer_minutes, 0);
            return !conflicts_with_any(start, &job, self.booked);
        }
        true
    }

    fn suggestion(&self, start: DateTime<Utc>, duration_minutes: u32) -> Suggestion {
        let end = start + Duration::minutes(duration_minutes as i64);
        Suggestion {
            start,
            end,
            day_label: day_label(start, &self.display_tz),
            time_range_label: time_range_label(start, end, &self.display_tz),
        }
    }
}

/// One line per suggestion, e.g. "Saturday, March 21: 9:00 AM - 10:00 AM".
pub fn suggestions_text(suggestions: &[Suggestion]) -> String {
    suggestions
        .iter()
        .map(|s| format!("{}: {}", s.day_label, s.time_range_label))
        .collect::<Vec<_>>()
        .join("\n")
}
