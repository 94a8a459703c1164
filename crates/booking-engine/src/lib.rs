//! # booking-engine
//!
//! Availability and scheduling rules for a home-services business that books
//! jobs onto a single shared calendar.
//!
//! The engine decides which windows are legally bookable, reconciles them
//! against already-booked calendar events, and proposes alternatives when a
//! requested time is refused. Rule evaluation is synchronous and pure; the
//! only async boundary is the [`gateway::CalendarGateway`].
//!
//! ## Modules
//!
//! - [`rules`] — Bookable days (weekends and holidays) and business hours
//! - [`holidays`] — Holiday tables, including generated US federal holidays
//! - [`slots`] — Per-day grid of candidate start times
//! - [`conflict`] — Mark candidate slots available or unavailable against booked intervals
//! - [`suggest`] — Forward search for alternative start times
//! - [`validator`] — End-to-end validation of a requested booking
//! - [`gateway`] — Async calendar boundary and an in-memory implementation
//! - [`service`] — Request/response surface combining the above
//! - [`interval`] — Half-open time intervals and booked periods
//! - [`config`] — Injectable scheduling configuration
//! - [`temporal`] — Local-time conversion and display labels
//! - [`error`] — Error types

pub mod config;
pub mod conflict;
pub mod error;
pub mod gateway;
pub mod holidays;
pub mod interval;
pub mod rules;
pub mod service;
pub mod slots;
pub mod suggest;
pub mod temporal;
pub mod validator;

pub use config::{BusinessHours, ConflictPolicy, SchedulingConfig, SuggestionPolicy};
pub use conflict::{compute_availability, JobDuration};
pub use error::SchedulingError;
pub use gateway::{CalendarGateway, CreatedEvent, GatewayError, InMemoryCalendar, NewEvent};
pub use holidays::{Holiday, HolidayCalendar};
pub use interval::{find_conflicts, BookedInterval, Conflict, TimeInterval};
pub use rules::{BusinessRules, PolicyViolation};
pub use service::{
    AvailabilityQuery, AvailabilityResponse, BookingConfirmation, BookingOutcome, BookingService,
    BookingSubmission, RejectionResponse, SlotView, SuggestedTime,
};
pub use slots::{generate_day_slots, CandidateSlot, SlotUnavailable};
pub use suggest::{AlternativeSuggester, Suggestion};
pub use validator::{BookingRequest, BookingValidator, Rejection, ValidationResult};
