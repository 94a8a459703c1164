//! Tests for booking validation and alternative suggestions.

use booking_engine::suggest::suggestions_text;
use booking_engine::{
    AlternativeSuggester, BookedInterval, BookingRequest, BookingValidator, BusinessHours,
    BusinessRules, ConflictPolicy, HolidayCalendar, PolicyViolation, Rejection, SchedulingConfig,
    TimeInterval, ValidationResult,
};
use chrono::{DateTime, Datelike, Duration, Utc, Weekday};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn utc(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn utc_config() -> SchedulingConfig {
    SchedulingConfig::default().with_time_zone(chrono_tz::UTC)
}

fn request(start: &str, minutes: u32) -> BookingRequest {
    BookingRequest::new(utc(start), chrono_tz::UTC, minutes).unwrap()
}

fn booked(start: &str, end: &str) -> BookedInterval {
    BookedInterval::new(TimeInterval::new(utc(start), utc(end)).unwrap(), "Window washing")
}

fn is_weekend(dt: DateTime<Utc>) -> bool {
    matches!(dt.weekday(), Weekday::Sat | Weekday::Sun)
}

// ── Policy rejections ───────────────────────────────────────────────────────

#[test]
fn tuesday_request_is_rejected_with_weekend_suggestions() {
    let config = utc_config();
    let result = BookingValidator::new(&config)
        .validate(&request("2026-03-24T10:00:00Z", 60), &[])
        .unwrap();

    let ValidationResult::Invalid { reason, suggestions } = result else {
        panic!("expected Invalid");
    };
    assert!(reason.to_string().contains("closed on Tuesdays"), "got: {reason}");
    assert_eq!(suggestions.len(), 3);
    assert!(suggestions.iter().all(|s| is_weekend(s.start)));
    assert_eq!(suggestions[0].start, utc("2026-03-28T07:00:00Z"));
    assert_eq!(suggestions[0].day_label, "Saturday, March 28");
    assert_eq!(suggestions[0].time_range_label, "7:00 AM - 8:00 AM");
    assert_eq!(suggestions[1].start, utc("2026-03-29T07:00:00Z"));
    assert_eq!(suggestions[2].start, utc("2026-04-04T07:00:00Z"));
}

#[test]
fn holiday_is_suggested_on_a_weekday() {
    let mut config = utc_config();
    config.holidays = HolidayCalendar::us_federal(2026);

    // Wednesday before Thanksgiving.
    let result = BookingValidator::new(&config)
        .validate(&request("2026-11-25T10:00:00Z", 120), &[])
        .unwrap();

    let ValidationResult::Invalid { suggestions, .. } = result else {
        panic!("expected Invalid");
    };
    let starts: Vec<_> = suggestions.iter().map(|s| s.start).collect();
    assert_eq!(
        starts,
        vec![
            utc("2026-11-26T07:00:00Z"),
            utc("2026-11-28T07:00:00Z"),
            utc("2026-11-29T07:00:00Z"),
        ]
    );
    assert_eq!(suggestions[0].day_label, "Thursday, November 26");
}

#[test]
fn late_saturday_request_gets_same_day_then_next_day() {
    let config = utc_config();
    // 16:30 + 120 min runs to 18:30, past close.
    let result = BookingValidator::new(&config)
        .validate(&request("2026-03-21T16:30:00Z", 120), &[])
        .unwrap();

    let ValidationResult::Invalid { reason, suggestions } = result else {
        panic!("expected Invalid");
    };
    assert!(matches!(reason, Rejection::Policy(PolicyViolation::PastClosing { .. })));
    // +1h and +2h also run past close, so the first suggestion is Sunday morning.
    assert_eq!(suggestions[0].start, utc("2026-03-22T07:00:00Z"));
}

#[test]
fn early_request_suggests_later_same_day() {
    let config = utc_config();
    let result = BookingValidator::new(&config)
        .validate(&request("2026-03-21T06:00:00Z", 60), &[])
        .unwrap();

    let ValidationResult::Invalid { reason, suggestions } = result else {
        panic!("expected Invalid");
    };
    assert_eq!(reason.to_string(), "We open at 7:00 AM. Please choose a later start time.");
    assert_eq!(suggestions[0].start, utc("2026-03-21T07:00:00Z"));
    assert_eq!(suggestions[1].start, utc("2026-03-21T08:00:00Z"));
    assert_eq!(suggestions[2].start, utc("2026-03-22T07:00:00Z"));
    assert_eq!(
        suggestions_text(&suggestions),
        "Saturday, March 21: 7:00 AM - 8:00 AM\n\
         Saturday, March 21: 8:00 AM - 9:00 AM\n\
         Sunday, March 22: 7:00 AM - 8:00 AM"
    );
}

#[test]
fn labels_follow_customer_timezone() {
    let config = utc_config();
    let customer =
        BookingRequest::new(utc("2026-03-24T10:00:00Z"), chrono_tz::America::Los_Angeles, 60)
            .unwrap();
    let result = BookingValidator::new(&config).validate(&customer, &[]).unwrap();

    let ValidationResult::Invalid { suggestions, .. } = result else {
        panic!("expected Invalid");
    };
    // Saturday 07:00 UTC is Saturday 00:00 PDT.
    assert_eq!(suggestions[0].day_label, "Saturday, March 28");
    assert_eq!(suggestions[0].time_range_label, "12:00 AM - 1:00 AM");
}

// ── Conflict policy ─────────────────────────────────────────────────────────

#[test]
fn double_booking_allowed_by_default() {
    let config = utc_config();
    let busy = vec![booked("2026-03-21T09:00:00Z", "2026-03-21T11:00:00Z")];
    let result = BookingValidator::new(&config)
        .validate(&request("2026-03-21T09:30:00Z", 60), &busy)
        .unwrap();
    assert!(result.is_valid());
}

#[test]
fn conflicts_rejected_when_policy_enabled() {
    let config = utc_config().with_conflict_policy(ConflictPolicy::RejectConflicts);
    let busy = vec![booked("2026-03-21T09:00:00Z", "2026-03-21T11:00:00Z")];
    let result = BookingValidator::new(&config)
        .validate(&request("2026-03-21T08:00:00Z", 60), &busy)
        .unwrap();

    // 08:00 + 60 + 30 buffer = 09:30 overlaps the 09:00 booking.
    let ValidationResult::Invalid { reason, suggestions } = result else {
        panic!("expected Invalid");
    };
    let Rejection::Conflict { conflicts } = &reason else {
        panic!("expected conflict rejection, got {reason:?}");
    };
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].overlap_minutes, 30);
    assert!(reason.to_string().contains("overlaps an existing booking"));
    // Suggestions are policy-valid only unless avoid_conflicts is set.
    assert_eq!(suggestions[0].start, utc("2026-03-21T09:00:00Z"));
}

#[test]
fn conflict_aware_suggestions_skip_booked_windows() {
    let mut config = utc_config().with_conflict_policy(ConflictPolicy::RejectConflicts);
    config.suggestions.avoid_conflicts = true;
    let busy = vec![
        booked("2026-03-21T09:00:00Z", "2026-03-21T11:00:00Z"),
        booked("2026-03-22T07:00:00Z", "2026-03-22T10:00:00Z"),
    ];
    let result = BookingValidator::new(&config)
        .validate(&request("2026-03-21T08:00:00Z", 60), &busy)
        .unwrap();

    let ValidationResult::Invalid { suggestions, .. } = result else {
        panic!("expected Invalid");
    };
    let starts: Vec<_> = suggestions.iter().map(|s| s.start).collect();
    assert_eq!(
        starts,
        vec![
            // 09:00 and 10:00 are inside the booking; Sunday's first free hour is 10:00.
            utc("2026-03-22T10:00:00Z"),
            utc("2026-03-28T07:00:00Z"),
            utc("2026-03-29T07:00:00Z"),
        ]
    );
}

#[test]
fn adjacent_booking_is_not_a_conflict() {
    let config = utc_config().with_conflict_policy(ConflictPolicy::RejectConflicts);
    // 08:00 + 60 + 30 = 09:30, booking starts at 09:30.
    let busy = vec![booked("2026-03-21T09:30:00Z", "2026-03-21T11:00:00Z")];
    let result = BookingValidator::new(&config)
        .validate(&request("2026-03-21T08:00:00Z", 60), &busy)
        .unwrap();
    assert!(result.is_valid());
}

// ── Suggester edge cases ────────────────────────────────────────────────────

#[test]
fn no_alternatives_within_budget_is_empty_not_error() {
    let mut config = utc_config().with_business_hours(BusinessHours::new(9, 10).unwrap());
    config.suggestions.search_days = 5;
    let rules = BusinessRules::new(&config);
    // Monday request, 90 minutes never fits a one-hour day.
    let requested = TimeInterval::starting_at(utc("2026-03-23T09:00:00Z"), 90).unwrap();
    let found = AlternativeSuggester::new(rules).suggest(&requested, 3);
    assert!(found.is_empty());
}

#[test]
fn search_budget_limits_days_scanned() {
    let mut config = utc_config();
    config.suggestions.search_days = 3;
    let rules = BusinessRules::new(&config);
    // Monday: the budget reaches Thursday, no weekend in range.
    let requested = TimeInterval::starting_at(utc("2026-03-23T10:00:00Z"), 60).unwrap();
    assert!(AlternativeSuggester::new(rules).suggest(&requested, 3).is_empty());
}

#[test]
fn suggestions_respect_window_rules() {
    let config = utc_config();
    let rules = BusinessRules::new(&config);
    let requested = TimeInterval::starting_at(utc("2026-03-25T15:00:00Z"), 240).unwrap();
    for s in AlternativeSuggester::new(rules).suggest(&requested, 3) {
        assert!(rules.validate_booking_window(s.start, s.end).is_ok());
        assert_eq!(s.end - s.start, Duration::minutes(240));
    }
}
