//! Wall-clock helpers shared by the scheduling modules.
//!
//! Every instant the engine stores is UTC. Business rules, however, are
//! phrased in local wall-clock terms ("open 7 AM to 6 PM on Saturdays"), so
//! this module owns the conversions between the two and the display formats
//! customers see. All functions are pure and take explicit inputs; nothing
//! here reads the system clock.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Utc, Weekday,
};
use chrono_tz::Tz;

use crate::error::SchedulingError;

// ── Parsing ─────────────────────────────────────────────────────────────────

/// Parse an RFC 3339 datetime string into `DateTime<Utc>`.
///
/// # Errors
///
/// Returns [`SchedulingError::InvalidDatetime`] if the string is not RFC 3339.
///
/// # Examples
///
/// ```
/// use booking_engine::temporal::parse_rfc3339;
///
/// let dt = parse_rfc3339("2026-03-21T09:00:00-04:00").unwrap();
/// assert_eq!(dt.to_rfc3339(), "2026-03-21T13:00:00+00:00");
/// ```
pub fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, SchedulingError> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SchedulingError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz, SchedulingError> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| SchedulingError::InvalidTimezone(format!("'{}'", s)))
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(s: &str) -> Result<NaiveDate, SchedulingError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| SchedulingError::InvalidDatetime(format!("'{}': {}", s, e)))
}

// ── Local ⇄ UTC ─────────────────────────────────────────────────────────────

/// Resolve a local wall-clock datetime in `tz` to a concrete instant.
///
/// Ambiguous times (fall-back overlap) take the earlier instant. Times that
/// do not exist (spring-forward gap) roll forward by the size of the gap, so
/// a 02:30 that never happens becomes 03:30.
pub fn localize(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}

/// The UTC instant of `time` on `date` in the business timezone.
pub fn local_instant(tz: &Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    localize(tz, date.and_time(time)).with_timezone(&Utc)
}

/// The local calendar date of `instant` in `tz`.
pub fn local_date(tz: &Tz, instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// The UTC instant of the top of `hour` on `date`. Hour 24 is midnight at the
/// start of the following day.
pub fn local_hour_instant(tz: &Tz, date: NaiveDate, hour: u32) -> DateTime<Utc> {
    match NaiveTime::from_hms_opt(hour, 0, 0) {
        Some(time) => local_instant(tz, date, time),
        None => {
            let next = date.succ_opt().unwrap_or(date);
            local_instant(tz, next, NaiveTime::MIN) + Duration::hours(hour as i64 - 24)
        }
    }
}

// ── Holiday arithmetic ──────────────────────────────────────────────────────

/// Find the Nth weekday in a month. ordinal < 0 means "last" (-1), "second to last" (-2), etc.
pub(crate) fn find_nth_weekday_in_month(
    year: i32,
    month: u32,
    weekday: Weekday,
    ordinal: i32,
) -> Option<NaiveDate> {
    if ordinal > 0 {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let diff = (weekday.num_days_from_monday() as i64
            - first.weekday().num_days_from_monday() as i64
            + 7)
            % 7;
        let target = first + Duration::days(diff) + Duration::weeks((ordinal - 1) as i64);
        (target.month() == month).then_some(target)
    } else {
        let (ny, nm) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let last = NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()?;
        let diff = (last.weekday().num_days_from_monday() as i64
            - weekday.num_days_from_monday() as i64
            + 7)
            % 7;
        let target = last - Duration::days(diff) - Duration::weeks((-ordinal - 1) as i64);
        (target.month() == month).then_some(target)
    }
}

// ── Display labels ──────────────────────────────────────────────────────────

/// Plural weekday name for customer-facing messages ("Tuesdays").
pub fn weekday_plural(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mondays",
        Weekday::Tue => "Tuesdays",
        Weekday::Wed => "Wednesdays",
        Weekday::Thu => "Thursdays",
        Weekday::Fri => "Fridays",
        Weekday::Sat => "Saturdays",
        Weekday::Sun => "Sundays",
    }
}

/// 12-hour clock label, e.g. "9:00 AM", "5:30 PM".
pub fn clock_label(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Day label for a suggestion, e.g. "Saturday, March 21".
pub fn day_label(instant: DateTime<Utc>, tz: &Tz) -> String {
    instant.with_timezone(tz).format("%A, %B %-d").to_string()
}

/// Time range label, e.g. "9:00 AM - 10:30 AM".
pub fn time_range_label(start: DateTime<Utc>, end: DateTime<Utc>, tz: &Tz) -> String {
    format!(
        "{} - {}",
        clock_label(start.with_timezone(tz).time()),
        clock_label(end.with_timezone(tz).time())
    )
}
