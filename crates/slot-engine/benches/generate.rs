use chrono::{Duration, NaiveTime, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use slot_engine::{
    generate_slots, AvailabilityWindow, BusyInterval, BusySource, EngineSettings, Weekday,
};
use std::hint::black_box;

fn weekday_windows() -> Vec<AvailabilityWindow> {
    let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
    Weekday::ALL[..5]
        .iter()
        .flat_map(|&day| {
            [
                AvailabilityWindow::new(day, hm(9, 0), hm(12, 0)),
                AvailabilityWindow::new(day, hm(13, 0), hm(17, 30)),
            ]
        })
        .collect()
}

fn busy_calendar(count: i64) -> Vec<BusyInterval> {
    let base = Utc.with_ymd_and_hms(2026, 3, 16, 9, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let start = base + Duration::minutes(i * 97);
            BusyInterval::new(start, start + Duration::minutes(45), BusySource::ExternalCalendar)
        })
        .collect()
}

fn bench_generate(c: &mut Criterion) {
    let windows = weekday_windows();
    let now = Utc.with_ymd_and_hms(2026, 3, 16, 8, 0, 0).unwrap();
    let settings = EngineSettings::default();

    let mut group = c.benchmark_group("generate_slots");
    for busy_count in [0, 100, 1000] {
        let busy = busy_calendar(busy_count);
        group.bench_function(format!("30d_30min_{}busy", busy_count), |b| {
            b.iter(|| {
                generate_slots(
                    black_box(&windows),
                    black_box(&busy),
                    30,
                    30,
                    now,
                    &settings,
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
