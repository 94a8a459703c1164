//! The async boundary to the external calendar.
//!
//! Everything else in the crate is synchronous and pure. The gateway is the
//! only place that suspends: reading busy intervals before availability is
//! computed, and writing the confirmed event afterwards. Implementations own
//! their own timeouts and authentication; the engine never retries.
//!
//! Writes accept an optional request id. Replaying a write with the same id
//! returns the event created the first time instead of creating a duplicate.
//! This deduplicates retries; it does not prevent two different requests
//! from booking overlapping windows.

use std::collections::HashMap;
use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::interval::{BookedInterval, TimeInterval};

/// Infrastructure failures talking to the calendar.
///
/// These are fatal to the current request and must never be reported to a
/// customer as "no availability".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("calendar credentials rejected: {0}")]
    Unauthorized(String),

    #[error("calendar unreachable: {0}")]
    Unavailable(String),

    #[error("calendar returned malformed data: {0}")]
    Malformed(String),
}

/// An event to write to the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub window: TimeInterval,
    pub summary: String,
    pub description: Option<String>,
    /// Idempotency key for safe retries.
    pub request_id: Option<String>,
}

/// An event the calendar accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedEvent {
    pub event_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Read and write access to the single shared booking calendar.
pub trait CalendarGateway: Send + Sync {
    /// Busy intervals overlapping `range`, sorted by start.
    fn busy_intervals(
        &self,
        range: TimeInterval,
    ) -> impl Future<Output = Result<Vec<BookedInterval>, GatewayError>> + Send;

    /// Persist a confirmed booking.
    fn create_event(
        &self,
        event: NewEvent,
    ) -> impl Future<Output = Result<CreatedEvent, GatewayError>> + Send;
}

#[derive(Debug, Default)]
struct CalendarState {
    events: Vec<(CreatedEvent, String)>,
    by_request_id: HashMap<String, CreatedEvent>,
    failure: Option<GatewayError>,
}

/// A process-local calendar, used by the CLI and in tests.
///
/// A failure can be injected with [`InMemoryCalendar::fail_with`] so callers
/// can exercise their infrastructure-error handling.
#[derive(Debug, Default)]
pub struct InMemoryCalendar {
    state: RwLock<CalendarState>,
}

impl InMemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the calendar with already-booked intervals.
    pub fn with_booked(booked: impl IntoIterator<Item = BookedInterval>) -> Self {
        let events = booked
            .into_iter()
            .map(|b| {
                let created = CreatedEvent {
                    event_id: new_event_id(),
                    start: b.start(),
                    end: b.end(),
                };
                (created, b.label)
            })
            .collect();
        Self {
            state: RwLock::new(CalendarState {
                events,
                ..Default::default()
            }),
        }
    }

    /// Make every subsequent call fail with `error` until [`recover`](Self::recover).
    pub async fn fail_with(&self, error: GatewayError) {
        self.state.write().await.failure = Some(error);
    }

    pub async fn recover(&self) {
        self.state.write().await.failure = None;
    }

    pub async fn event_count(&self) -> usize {
        self.state.read().await.events.len()
    }
}

impl CalendarGateway for InMemoryCalendar {
    async fn busy_intervals(
        &self,
        range: TimeInterval,
    ) -> Result<Vec<BookedInterval>, GatewayError> {
        let state = self.state.read().await;
        if let Some(err) = &state.failure {
            warn!(error = %err, "busy interval query failed");
            return Err(err.clone());
        }

        let mut busy = Vec::new();
        for (event, label) in &state.events {
            let interval = TimeInterval::new(event.start, event.end)
                .map_err(|e| GatewayError::Malformed(format!("event {}: {}", event.event_id, e)))?;
            if interval.overlaps(&range) {
                busy.push(BookedInterval::new(interval, label.clone()));
            }
        }
        busy.sort_by_key(|b| b.start());

        debug!(
            from = %range.start(),
            to = %range.end(),
            count = busy.len(),
            "fetched busy intervals"
        );
        Ok(busy)
    }

    async fn create_event(&self, event: NewEvent) -> Result<CreatedEvent, GatewayError> {
        let mut state = self.state.write().await;
        if let Some(err) = &state.failure {
            warn!(error = %err, "event creation failed");
            return Err(err.clone());
        }

        if let Some(existing) = event
            .request_id
            .as_ref()
            .and_then(|id| state.by_request_id.get(id))
        {
            info!(event_id = %existing.event_id, "replayed request id, returning existing event");
            return Ok(existing.clone());
        }

        let created = CreatedEvent {
            event_id: new_event_id(),
            start: event.window.start(),
            end: event.window.end(),
        };
        if let Some(id) = event.request_id {
            state.by_request_id.insert(id, created.clone());
        }
        state.events.push((created.clone(), event.summary));

        info!(event_id = %created.event_id, start = %created.start, "created calendar event");
        Ok(created)
    }
}

fn new_event_id() -> String {
    format!("evt_{}", uuid::Uuid::new_v4().simple())
}
