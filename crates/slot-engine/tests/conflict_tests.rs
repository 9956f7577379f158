//! Tests for slot / busy-interval conflict detection.

use chrono::{DateTime, TimeZone, Utc};
use slot_engine::conflict::{conflicts, ranges_overlap};
use slot_engine::{BusyInterval, BusySource, ConflictDetector, ScheduledMeetingRule, SlotCandidate};

/// Helper: a UTC instant on March 2026.
fn at(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, min, 0).unwrap()
}

fn slot(day: u32, start: (u32, u32), end: (u32, u32)) -> SlotCandidate {
    SlotCandidate {
        start: at(day, start.0, start.1),
        end: at(day, end.0, end.1),
    }
}

fn busy(day: u32, start: (u32, u32), end: (u32, u32), source: BusySource) -> BusyInterval {
    BusyInterval::new(at(day, start.0, start.1), at(day, end.0, end.1), source)
}

#[test]
fn partial_overlap_conflicts() {
    // Slot 09:00-09:30, busy 09:15-10:00
    let s = slot(16, (9, 0), (9, 30));
    let b = busy(16, (9, 15), (10, 0), BusySource::ExternalCalendar);
    assert!(conflicts(&s, &b));
}

#[test]
fn slot_inside_busy_conflicts() {
    let s = slot(16, (9, 30), (10, 0));
    let b = busy(16, (9, 0), (11, 0), BusySource::ExternalCalendar);
    assert!(conflicts(&s, &b));
}

#[test]
fn busy_inside_slot_conflicts() {
    let s = slot(16, (9, 0), (10, 0));
    let b = busy(16, (9, 20), (9, 40), BusySource::ExternalCalendar);
    assert!(conflicts(&s, &b));
}

#[test]
fn identical_ranges_conflict() {
    let s = slot(16, (9, 0), (9, 30));
    let b = busy(16, (9, 0), (9, 30), BusySource::ScheduledMeeting);
    assert!(conflicts(&s, &b));
}

#[test]
fn touching_ranges_do_not_conflict() {
    let s = slot(16, (9, 0), (9, 30));
    let before = busy(16, (8, 30), (9, 0), BusySource::ExternalCalendar);
    let after = busy(16, (9, 30), (10, 0), BusySource::ExternalCalendar);
    assert!(!conflicts(&s, &before));
    assert!(!conflicts(&s, &after));
}

#[test]
fn zero_length_busy_interval_inside_slot_conflicts() {
    let s = slot(16, (9, 0), (10, 0));
    let b = busy(16, (9, 30), (9, 30), BusySource::ExternalCalendar);
    assert!(ranges_overlap(s.start, s.end, b.start, b.end));
}

#[test]
fn default_rule_treats_scheduled_meetings_like_any_interval() {
    // Same time of day, different date: no overlap, no conflict.
    let detector = ConflictDetector::default();
    let s = slot(17, (10, 0), (10, 30));
    let b = busy(16, (10, 0), (10, 30), BusySource::ScheduledMeeting);
    assert!(!detector.conflicts(&s, &b));
}

#[test]
fn time_of_day_rule_blocks_same_clock_time_on_other_dates() {
    let detector = ConflictDetector::new(ScheduledMeetingRule::MatchTimeOfDay, chrono_tz::Tz::UTC);
    let s = slot(17, (10, 0), (10, 30));
    let meeting = busy(16, (10, 0), (10, 30), BusySource::ScheduledMeeting);
    let calendar = busy(16, (10, 0), (10, 30), BusySource::ExternalCalendar);

    assert!(detector.conflicts(&s, &meeting));
    // The extra rule never applies to calendar events.
    assert!(!detector.conflicts(&s, &calendar));
}

#[test]
fn time_of_day_rule_reads_clock_in_configured_timezone() {
    // 14:00 UTC is 10:00 in New York (EDT after 2026-03-08).
    let tz = chrono_tz::America::New_York;
    let detector = ConflictDetector::new(ScheduledMeetingRule::MatchTimeOfDay, tz);
    let s = slot(20, (14, 0), (14, 30));
    let meeting = busy(16, (14, 0), (14, 30), BusySource::ScheduledMeeting);
    assert!(detector.conflicts(&s, &meeting));

    let other = busy(16, (15, 0), (15, 30), BusySource::ScheduledMeeting);
    assert!(!detector.conflicts(&s, &other));
}

#[test]
fn first_conflict_returns_the_earliest_listed_interval() {
    let detector = ConflictDetector::default();
    let s = slot(16, (9, 0), (10, 0));
    let intervals = vec![
        busy(16, (7, 0), (8, 0), BusySource::ExternalCalendar),
        busy(16, (9, 30), (9, 45), BusySource::ScheduledMeeting),
        busy(16, (9, 0), (9, 15), BusySource::ExternalCalendar),
    ];
    assert_eq!(detector.first_conflict(&s, &intervals), Some(&intervals[1]));
    assert_eq!(detector.first_conflict(&s, &intervals[..1]), None);
}
