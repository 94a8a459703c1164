//! Scheduling configuration.
//!
//! Every policy knob the engine consults lives here so markets and years can
//! differ without code changes: business hours, the changeover buffer, the
//! business timezone, slot granularity, holiday tables, and the two conflict
//! switches (write-path double booking and conflict-aware suggestions).
//!
//! Configuration is usually loaded from TOML:
//!
//! ```toml
//! time_zone = "America/Chicago"
//! buffer_minutes = 30
//! slot_granularity_minutes = 60
//! conflict_policy = "allow_double_booking"
//! us_federal_holidays = [2026]
//!
//! [business_hours]
//! start_hour = 7
//! end_hour = 18
//!
//! [suggestions]
//! max_suggestions = 3
//! search_days = 60
//! avoid_conflicts = false
//!
//! [[holidays]]
//! date = "2026-12-24"
//! name = "Christmas Eve"
//! ```

use std::path::Path;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulingError};
use crate::holidays::{Holiday, HolidayCalendar};

/// Opening hours as `[start_hour, end_hour)` in local wall-clock hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl BusinessHours {
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self> {
        let hours = Self {
            start_hour,
            end_hour,
        };
        hours.validate()?;
        Ok(hours)
    }

    pub fn validate(&self) -> Result<()> {
        if self.start_hour >= self.end_hour || self.end_hour > 24 {
            return Err(SchedulingError::InvalidConfig(format!(
                "business hours must satisfy start < end <= 24, got {}-{}",
                self.start_hour, self.end_hour
            )));
        }
        Ok(())
    }

    /// `start_hour <= hour < end_hour`.
    pub fn contains_hour(&self, hour: u32) -> bool {
        self.start_hour <= hour && hour < self.end_hour
    }
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            start_hour: 7,
            end_hour: 18,
        }
    }
}

/// Whether the booking write path refuses windows that overlap booked events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Accept overlapping bookings. Only day/hour rules are enforced.
    #[default]
    AllowDoubleBooking,
    /// Reject a request whose occupied window overlaps a booked interval.
    RejectConflicts,
}

/// How alternative start times are searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionPolicy {
    pub max_suggestions: usize,
    /// Calendar days searched forward before giving up.
    pub search_days: u32,
    /// Also drop candidates that overlap booked intervals.
    pub avoid_conflicts: bool,
}

impl Default for SuggestionPolicy {
    fn default() -> Self {
        Self {
            max_suggestions: 3,
            search_days: 60,
            avoid_conflicts: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Timezone business hours and bookable days are evaluated in.
    pub time_zone: Tz,
    pub business_hours: BusinessHours,
    /// Changeover time added after every job, on top of travel.
    pub buffer_minutes: u32,
    pub slot_granularity_minutes: u32,
    pub conflict_policy: ConflictPolicy,
    pub suggestions: SuggestionPolicy,
    pub holidays: HolidayCalendar,
    /// Years whose US federal holidays are merged into `holidays`.
    #[serde(skip_serializing)]
    pub us_federal_holidays: Vec<i32>,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            time_zone: chrono_tz::America::New_York,
            business_hours: BusinessHours::default(),
            buffer_minutes: 30,
            slot_granularity_minutes: 60,
            conflict_policy: ConflictPolicy::default(),
            suggestions: SuggestionPolicy::default(),
            holidays: HolidayCalendar::default(),
            us_federal_holidays: Vec::new(),
        }
    }
}

impl SchedulingConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SchedulingError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string, expanding generated holiday
    /// years and validating the result.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: SchedulingConfig =
            toml::from_str(content).map_err(|e| SchedulingError::InvalidConfig(e.to_string()))?;
        config.expand_generated_holidays();
        config.validate()?;
        Ok(config)
    }

    /// Builder-style holiday injection.
    pub fn with_holidays(mut self, holidays: impl IntoIterator<Item = Holiday>) -> Self {
        self.holidays.extend(holidays);
        self
    }

    pub fn with_business_hours(mut self, hours: BusinessHours) -> Self {
        self.business_hours = hours;
        self
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    pub fn with_time_zone(mut self, tz: Tz) -> Self {
        self.time_zone = tz;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.business_hours.validate()?;
        if self.slot_granularity_minutes == 0 {
            return Err(SchedulingError::InvalidConfig(
                "slot_granularity_minutes must be greater than zero".to_string(),
            ));
        }
        if self.suggestions.max_suggestions == 0 {
            return Err(SchedulingError::InvalidConfig(
                "suggestions.max_suggestions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    // Explicit [[holidays]] entries win over generated ones on the same date.
    fn expand_generated_holidays(&mut self) {
        let explicit: Vec<Holiday> = self.holidays.iter().collect();
        let mut merged = HolidayCalendar::default();
        for year in &self.us_federal_holidays {
            merged.extend(HolidayCalendar::us_federal(*year).iter());
        }
        merged.extend(explicit);
        self.holidays = merged;
    }
}
