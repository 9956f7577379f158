//! Property-based tests for slot generation and window validation using proptest.
//!
//! These tests verify invariants that should hold for *any* window set, busy
//! list and reference time, not just the scenarios in `generator_tests.rs`.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use proptest::prelude::*;
use slot_engine::conflict::conflicts;
use slot_engine::window::{overlaps, validate_set};
use slot_engine::{
    generate_slots, AvailabilityWindow, BusyInterval, BusySource, EngineSettings, Weekday,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_weekday() -> impl Strategy<Value = Weekday> {
    prop::sample::select(Weekday::ALL.to_vec())
}

/// A well-formed window on a quarter-hour grid.
fn arb_window() -> impl Strategy<Value = AvailabilityWindow> {
    (arb_weekday(), 0u32..88, 1u32..=16).prop_map(|(day, start_q, len_q)| {
        let start = start_q * 15;
        let end = (start + len_q * 15).min(23 * 60 + 59);
        AvailabilityWindow::new(
            day,
            NaiveTime::from_hms_opt(start / 60, start % 60, 0).unwrap(),
            NaiveTime::from_hms_opt(end / 60, end % 60, 0).unwrap(),
        )
    })
}

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, 0, 0, 0).unwrap()
}

/// Busy intervals scattered over the first three weeks from `base()`.
fn arb_busy() -> impl Strategy<Value = BusyInterval> {
    (0i64..(21 * 24 * 4), 1i64..12, any::<bool>()).prop_map(|(offset_q, len_q, scheduled)| {
        let start = base() + Duration::minutes(offset_q * 15);
        let source = if scheduled {
            BusySource::ScheduledMeeting
        } else {
            BusySource::ExternalCalendar
        };
        BusyInterval::new(start, start + Duration::minutes(len_q * 15), source)
    })
}

fn arb_now() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..(7 * 24 * 60)).prop_map(|m| base() + Duration::minutes(m))
}

fn arb_duration() -> impl Strategy<Value = i64> {
    prop_oneof![Just(15i64), Just(30), Just(45), Just(60), 5i64..=120]
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn slots_have_exact_length_and_are_future(
        windows in prop::collection::vec(arb_window(), 0..6),
        busy in prop::collection::vec(arb_busy(), 0..10),
        now in arb_now(),
        duration in arb_duration(),
        horizon in 0i64..14,
    ) {
        let result = generate_slots(&windows, &busy, duration, horizon, now, &EngineSettings::default()).unwrap();
        for slot in &result.slots {
            prop_assert_eq!(slot.end - slot.start, Duration::minutes(duration));
            prop_assert!(slot.start > now);
        }
    }

    #[test]
    fn slots_never_conflict_with_busy_time(
        windows in prop::collection::vec(arb_window(), 0..6),
        busy in prop::collection::vec(arb_busy(), 0..10),
        now in arb_now(),
        duration in arb_duration(),
        horizon in 0i64..14,
    ) {
        let result = generate_slots(&windows, &busy, duration, horizon, now, &EngineSettings::default()).unwrap();
        for slot in &result.slots {
            for interval in &busy {
                prop_assert!(!conflicts(slot, interval));
            }
        }
    }

    #[test]
    fn slots_fit_inside_a_matching_window(
        windows in prop::collection::vec(arb_window(), 1..6),
        now in arb_now(),
        duration in arb_duration(),
        horizon in 0i64..14,
    ) {
        let result = generate_slots(&windows, &[], duration, horizon, now, &EngineSettings::default()).unwrap();
        for slot in &result.slots {
            let day = Weekday::from(chrono::Datelike::weekday(&slot.start.date_naive()));
            let fits = windows.iter().any(|w| {
                w.weekday == day
                    && slot.start.time() >= w.start_time
                    && slot.start.date_naive() == slot.end.date_naive()
                    && slot.end.time() <= w.end_time
            });
            prop_assert!(fits, "slot {:?} fits no window", slot);
        }
    }

    #[test]
    fn slots_are_ordered_and_output_is_deterministic(
        windows in prop::collection::vec(arb_window(), 0..6),
        busy in prop::collection::vec(arb_busy(), 0..10),
        now in arb_now(),
        duration in arb_duration(),
        horizon in 0i64..14,
    ) {
        let settings = EngineSettings::default();
        let first = generate_slots(&windows, &busy, duration, horizon, now, &settings).unwrap();
        let second = generate_slots(&windows, &busy, duration, horizon, now, &settings).unwrap();
        prop_assert!(first.slots.windows(2).all(|pair| pair[0].start <= pair[1].start));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn validated_sets_never_contain_overlaps(
        windows in prop::collection::vec(arb_window(), 0..10),
    ) {
        if validate_set(&windows).is_ok() {
            for (i, a) in windows.iter().enumerate() {
                for b in &windows[i + 1..] {
                    prop_assert!(!overlaps(a, b));
                }
            }
        }
    }

    #[test]
    fn overlap_is_symmetric(a in arb_window(), b in arb_window()) {
        prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
    }
}
