//! Request/response surface over the scheduling core.
//!
//! [`BookingService`] owns an injected [`CalendarGateway`] handle for its
//! whole lifetime and fetches a fresh busy-interval snapshot on every call.
//! The wire types here use camelCase field names and ISO-8601 instants.

use std::sync::Arc;

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{BusinessHours, ConflictPolicy, SchedulingConfig};
use crate::conflict::{check_job_minutes, compute_availability, slot_interval, JobDuration};
use crate::error::{Result, SchedulingError};
use crate::gateway::{CalendarGateway, NewEvent};
use crate::interval::{BookedInterval, TimeInterval};
use crate::suggest::{suggestions_text, Suggestion};
use crate::temporal::local_instant;
use crate::validator::{BookingRequest, BookingValidator, ValidationResult};

const DEFAULT_SLOT_DURATION_MINUTES: u32 = 60;

// ── Availability ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    pub business_hours_start: Option<u32>,
    pub business_hours_end: Option<u32>,
    /// Service length used for each slot; defaults to 60.
    pub slot_duration_minutes: Option<u32>,
    pub travel_buffer_minutes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub date: NaiveDate,
    pub slots: Vec<SlotView>,
}

// ── Booking ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSubmission {
    pub requested_start: DateTime<Utc>,
    pub duration_minutes: u32,
    /// Customer display zone; the business zone is used when absent.
    #[serde(default)]
    pub time_zone: Option<Tz>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedTime {
    pub date: DateTime<Utc>,
    pub day_name: String,
    pub time_range: String,
}

impl From<&Suggestion> for SuggestedTime {
    fn from(s: &Suggestion) -> Self {
        Self {
            date: s.start,
            day_name: s.day_label.clone(),
            time_range: s.time_range_label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionResponse {
    pub error: String,
    pub suggested_times: Vec<SuggestedTime>,
    pub suggested_times_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub event_id: String,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BookingOutcome {
    Confirmed(BookingConfirmation),
    Rejected(RejectionResponse),
}

impl BookingOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, BookingOutcome::Confirmed(_))
    }
}

/// Converts an engine rejection to the wire shape; `None` for `Valid`.
pub fn rejection_response(result: &ValidationResult) -> Option<RejectionResponse> {
    match result {
        ValidationResult::Valid => None,
        ValidationResult::Invalid {
            reason,
            suggestions,
        } => Some(RejectionResponse {
            error: reason.to_string(),
            suggested_times: suggestions.iter().map(SuggestedTime::from).collect(),
            suggested_times_text: suggestions_text(suggestions),
        }),
    }
}

// ── Service ─────────────────────────────────────────────────────────────────

pub struct BookingService<G> {
    gateway: Arc<G>,
    config: SchedulingConfig,
}

impl<G: CalendarGateway> BookingService<G> {
    pub fn new(gateway: Arc<G>, config: SchedulingConfig) -> Self {
        Self { gateway, config }
    }

    pub fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Slot-by-slot availability for one local day.
    ///
    /// Booking conflicts always block here, whatever the write-path
    /// [`ConflictPolicy`] says.
    ///
    /// # Errors
    ///
    /// [`SchedulingError::InvalidConfig`] for bad hour overrides,
    /// [`SchedulingError::InvalidDuration`] for a zero slot duration or a
    /// slot or travel time longer than a day, and
    /// [`SchedulingError::Gateway`] when the calendar cannot be read.
    pub async fn availability(&self, query: &AvailabilityQuery) -> Result<AvailabilityResponse> {
        let mut config = self.config.clone();
        if query.business_hours_start.is_some() || query.business_hours_end.is_some() {
            config.business_hours = BusinessHours::new(
                query
                    .business_hours_start
                    .unwrap_or(config.business_hours.start_hour),
                query
                    .business_hours_end
                    .unwrap_or(config.business_hours.end_hour),
            )?;
        }
        let service_minutes = query
            .slot_duration_minutes
            .unwrap_or(DEFAULT_SLOT_DURATION_MINUTES);
        if service_minutes == 0 {
            return Err(SchedulingError::InvalidDuration(
                "slot duration must be greater than zero minutes".to_string(),
            ));
        }
        check_job_minutes("slot duration", service_minutes)?;
        let travel_minutes =
            check_job_minutes("travel buffer", query.travel_buffer_minutes.unwrap_or(0))?;

        let booked = self
            .gateway
            .busy_intervals(day_range(&config, query.date)?)
            .await?;
        let slots =
            compute_availability(&config, query.date, service_minutes, travel_minutes, &booked);

        let views = slots
            .iter()
            .filter_map(|slot| {
                let interval = slot_interval(&config, query.date, slot, service_minutes)?;
                Some(SlotView {
                    start: interval.start(),
                    end: interval.end(),
                    available: slot.available,
                    reason: slot.reason.map(|r| r.to_string()),
                })
            })
            .collect::<Vec<_>>();

        debug!(
            date = %query.date,
            slots = views.len(),
            available = views.iter().filter(|s| s.available).count(),
            "computed availability"
        );
        Ok(AvailabilityResponse {
            date: query.date,
            slots: views,
        })
    }

    /// Validate a submission without writing anything.
    pub async fn validate(&self, submission: &BookingSubmission) -> Result<ValidationResult> {
        let request = self.request_from(submission)?;
        let booked = self.snapshot_for(&request).await?;
        BookingValidator::new(&self.config).validate(&request, &booked)
    }

    /// Validate and, if accepted, write the event to the calendar.
    ///
    /// Rule rejections come back as `Ok(BookingOutcome::Rejected(..))`;
    /// only calendar failures and malformed input are `Err`.
    pub async fn submit(&self, submission: &BookingSubmission) -> Result<BookingOutcome> {
        let request = self.request_from(submission)?;
        let booked = self.snapshot_for(&request).await?;
        let result = BookingValidator::new(&self.config).validate(&request, &booked)?;

        if let Some(rejection) = rejection_response(&result) {
            info!(
                start = %request.requested_start,
                reason = %rejection.error,
                suggestions = rejection.suggested_times.len(),
                "booking rejected"
            );
            return Ok(BookingOutcome::Rejected(rejection));
        }

        let created = self
            .gateway
            .create_event(NewEvent {
                window: request.window()?,
                summary: submission
                    .summary
                    .clone()
                    .unwrap_or_else(|| "Service booking".to_string()),
                description: submission.description.clone(),
                request_id: submission.request_id.clone(),
            })
            .await?;

        Ok(BookingOutcome::Confirmed(BookingConfirmation {
            event_id: created.event_id,
            start_time: created.start,
            duration_minutes: request.duration_minutes,
        }))
    }

    fn request_from(&self, submission: &BookingSubmission) -> Result<BookingRequest> {
        BookingRequest::new(
            submission.requested_start,
            submission.time_zone.unwrap_or(self.config.time_zone),
            submission.duration_minutes,
        )
    }

    // Busy intervals are only fetched when a policy will read them.
    async fn snapshot_for(&self, request: &BookingRequest) -> Result<Vec<BookedInterval>> {
        let avoid = self.config.suggestions.avoid_conflicts;
        let reject = self.config.conflict_policy == ConflictPolicy::RejectConflicts;
        if !avoid && !reject {
            return Ok(Vec::new());
        }

        let start = request.requested_start;
        let job = JobDuration::new(request.duration_minutes, self.config.buffer_minutes, 0);
        let mut end = job.occupied_end(start);
        if avoid {
            end += Duration::days(i64::from(self.config.suggestions.search_days) + 1);
        }
        let range = TimeInterval::new(start, end)?;
        Ok(self.gateway.busy_intervals(range).await?)
    }
}

// Local midnight to the following local midnight, plus enough slack for an
// occupied window that starts at the last slot.
fn day_range(config: &SchedulingConfig, date: NaiveDate) -> Result<TimeInterval> {
    let tz = &config.time_zone;
    let next = date
        .checked_add_days(Days::new(1))
        .ok_or_else(|| SchedulingError::InvalidDatetime(format!("'{date}': out of range")))?;
    let start = local_instant(tz, date, NaiveTime::MIN);
    let end = local_instant(tz, next, NaiveTime::MIN) + Duration::days(1);
    TimeInterval::new(start, end)
}
