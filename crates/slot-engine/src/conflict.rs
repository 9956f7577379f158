//! Decide whether a candidate slot collides with committed time.
//!
//! A slot conflicts with a busy interval when their half-open ranges intersect.
//! Adjacent ranges (one ends exactly when the other starts) are NOT conflicts.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::model::{BusyInterval, BusySource, SlotCandidate};

/// Extra matching applied to intervals sourced from previously booked meetings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduledMeetingRule {
    /// Scheduled meetings block exactly the time they overlap, like any other interval.
    #[default]
    OverlapOnly,
    /// Scheduled meetings also block every slot starting at the same local
    /// hour and minute, on any date.
    MatchTimeOfDay,
}

/// `[a_start, a_end)` and `[b_start, b_end)` intersect.
pub fn ranges_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// The general overlap rule, identical for every source.
pub fn conflicts(slot: &SlotCandidate, interval: &BusyInterval) -> bool {
    ranges_overlap(slot.start, slot.end, interval.start, interval.end)
}

/// Conflict checks under a particular [`ScheduledMeetingRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictDetector {
    rule: ScheduledMeetingRule,
    /// Timezone "time of day" is read in for `MatchTimeOfDay`.
    timezone: Tz,
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new(ScheduledMeetingRule::default(), Tz::UTC)
    }
}

impl ConflictDetector {
    pub fn new(rule: ScheduledMeetingRule, timezone: Tz) -> Self {
        Self { rule, timezone }
    }

    pub fn conflicts(&self, slot: &SlotCandidate, interval: &BusyInterval) -> bool {
        if conflicts(slot, interval) {
            return true;
        }
        self.rule == ScheduledMeetingRule::MatchTimeOfDay
            && interval.source == BusySource::ScheduledMeeting
            && self.same_time_of_day(slot.start, interval.start)
    }

    /// The first interval in `intervals` that `slot` conflicts with, if any.
    ///
    /// The generator keeps a candidate only when this is `None`.
    pub fn first_conflict<'a>(
        &self,
        slot: &SlotCandidate,
        intervals: &'a [BusyInterval],
    ) -> Option<&'a BusyInterval> {
        intervals.iter().find(|interval| self.conflicts(slot, interval))
    }

    fn same_time_of_day(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        let a = a.with_timezone(&self.timezone);
        let b = b.with_timezone(&self.timezone);
        a.hour() == b.hour() && a.minute() == b.minute()
    }
}
