use booking_engine::conflict::compute_availability;
use booking_engine::{
    AlternativeSuggester, BookedInterval, BusinessRules, SchedulingConfig, TimeInterval,
};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn busy_day(count: usize) -> Vec<BookedInterval> {
    let start = Utc.with_ymd_and_hms(2026, 3, 21, 7, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let s = start + Duration::minutes(i as i64 * 25);
            BookedInterval::new(
                TimeInterval::new(s, s + Duration::minutes(20)).unwrap(),
                format!("job {i}"),
            )
        })
        .collect()
}

fn bench_availability(c: &mut Criterion) {
    let mut config = SchedulingConfig::default().with_time_zone(chrono_tz::UTC);
    config.slot_granularity_minutes = 15;
    let date = NaiveDate::from_ymd_opt(2026, 3, 21).unwrap();
    let booked = busy_day(24);

    c.bench_function("compute_availability_15min_grid_24_bookings", |b| {
        b.iter(|| compute_availability(black_box(&config), date, 90, 20, black_box(&booked)))
    });
}

fn bench_suggestions(c: &mut Criterion) {
    let mut config = SchedulingConfig::default().with_time_zone(chrono_tz::UTC);
    config.suggestions.avoid_conflicts = true;
    let booked = busy_day(24);
    let requested = TimeInterval::starting_at(
        Utc.with_ymd_and_hms(2026, 3, 23, 10, 0, 0).unwrap(),
        120,
    )
    .unwrap();

    c.bench_function("suggest_alternatives_conflict_aware", |b| {
        b.iter(|| {
            AlternativeSuggester::new(BusinessRules::new(&config))
                .with_booked(black_box(&booked))
                .suggest(black_box(&requested), 3)
        })
    });
}

criterion_group!(benches, bench_availability, bench_suggestions);
criterion_main!(benches);
