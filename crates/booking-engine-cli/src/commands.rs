use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use booking_engine::service::rejection_response;
use booking_engine::temporal::{parse_date, parse_rfc3339, parse_timezone};
use booking_engine::{
    AvailabilityQuery, BookedInterval, BookingOutcome, BookingService, BookingSubmission,
    HolidayCalendar, InMemoryCalendar, SchedulingConfig,
};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

/// Exit status for a request the rules refused.
const EXIT_REJECTED: u8 = 2;

pub struct Context {
    service: BookingService<InMemoryCalendar>,
}

impl Context {
    pub fn load(config: Option<&Path>, events: Option<&Path>) -> Result<Self> {
        let config = match config {
            Some(path) => SchedulingConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => SchedulingConfig::default(),
        };
        let booked = match events {
            Some(path) => read_events(path)?,
            None => Vec::new(),
        };
        debug!(
            time_zone = %config.time_zone,
            holidays = config.holidays.len(),
            booked = booked.len(),
            "loaded scheduling context"
        );
        let calendar = Arc::new(InMemoryCalendar::with_booked(booked));
        Ok(Self {
            service: BookingService::new(calendar, config),
        })
    }
}

fn read_events(path: &Path) -> Result<Vec<BookedInterval>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading events {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing events {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn availability(
    ctx: &Context,
    date: &str,
    start_hour: Option<u32>,
    end_hour: Option<u32>,
    duration: Option<u32>,
    travel: Option<u32>,
    available_only: bool,
) -> Result<ExitCode> {
    let query = AvailabilityQuery {
        date: parse_date(date)?,
        business_hours_start: start_hour,
        business_hours_end: end_hour,
        slot_duration_minutes: duration,
        travel_buffer_minutes: travel,
    };
    let mut response = ctx.service.availability(&query).await?;
    if available_only {
        response.slots.retain(|slot| slot.available);
    }
    print_json(&response)?;
    Ok(ExitCode::SUCCESS)
}

fn submission(
    start: &str,
    duration: u32,
    tz: Option<&str>,
    summary: Option<String>,
    request_id: Option<String>,
) -> Result<BookingSubmission> {
    Ok(BookingSubmission {
        requested_start: parse_rfc3339(start)?,
        duration_minutes: duration,
        time_zone: tz.map(parse_timezone).transpose()?,
        summary,
        description: None,
        request_id,
    })
}

pub async fn validate(
    ctx: &Context,
    start: &str,
    duration: u32,
    tz: Option<&str>,
) -> Result<ExitCode> {
    let result = ctx
        .service
        .validate(&submission(start, duration, tz, None, None)?)
        .await?;
    match rejection_response(&result) {
        None => {
            print_json(&json!({ "valid": true }))?;
            Ok(ExitCode::SUCCESS)
        }
        Some(rejection) => {
            print_json(&json!({
                "valid": false,
                "error": rejection.error,
                "suggestedTimes": rejection.suggested_times,
                "suggestedTimesText": rejection.suggested_times_text,
            }))?;
            Ok(ExitCode::from(EXIT_REJECTED))
        }
    }
}

pub async fn book(
    ctx: &Context,
    start: &str,
    duration: u32,
    tz: Option<&str>,
    summary: Option<String>,
    request_id: Option<String>,
) -> Result<ExitCode> {
    let outcome = ctx
        .service
        .submit(&submission(start, duration, tz, summary, request_id)?)
        .await
        .context("booking failed")?;
    print_json(&outcome)?;
    Ok(match outcome {
        BookingOutcome::Confirmed(_) => ExitCode::SUCCESS,
        BookingOutcome::Rejected(_) => ExitCode::from(EXIT_REJECTED),
    })
}

/// Configured holidays, merged over generated federal ones when `year` is set.
pub fn holidays(ctx: &Context, year: Option<i32>) -> Result<ExitCode> {
    let configured = &ctx.service.config().holidays;
    let calendar = match year {
        Some(year) => {
            let mut merged = HolidayCalendar::us_federal(year);
            merged.extend(configured.iter());
            merged
        }
        None => configured.clone(),
    };
    print_json(&calendar.iter().collect::<Vec<_>>())?;
    Ok(ExitCode::SUCCESS)
}
