//! DST transition policies for window boundaries.
//!
//! Availability windows are declared in wall-clock time. On transition days a
//! boundary such as 02:30 may not exist (spring forward) or may exist twice
//! (fall back). Ambiguous times always resolve to the earlier instant.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Gaps are at most a few hours wide; looking this far back always lands
/// before the transition.
const GAP_LOOKBACK_HOURS: i64 = 6;

/// Policy for window boundaries that fall inside a DST gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Drop the window for that day.
    Skip,
    /// Shift the boundary forward by the length of the gap (02:30 becomes 03:30).
    #[default]
    ShiftForward,
}

/// Resolve a local wall-clock time in `tz` to a UTC instant.
///
/// Returns `None` only when the time falls in a gap and `policy` is `Skip`.
pub fn resolve_local(tz: &Tz, local: NaiveDateTime, policy: DstPolicy) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => {
                // Apply the offset in force just before the gap.
                let before = tz
                    .from_local_datetime(&(local - Duration::hours(GAP_LOOKBACK_HOURS)))
                    .earliest()?;
                let offset_secs = before.offset().fix().local_minus_utc();
                Some((local - Duration::seconds(i64::from(offset_secs))).and_utc())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn utc_is_identity() {
        let resolved = resolve_local(&Tz::UTC, local(2026, 3, 16, 9, 0), DstPolicy::Skip).unwrap();
        assert_eq!(resolved.naive_utc(), local(2026, 3, 16, 9, 0));
    }

    #[test]
    fn gap_is_skipped_or_shifted() {
        // 2026-03-08 02:30 does not exist in America/New_York.
        let tz = chrono_tz::America::New_York;
        let in_gap = local(2026, 3, 8, 2, 30);

        assert!(resolve_local(&tz, in_gap, DstPolicy::Skip).is_none());

        let shifted = resolve_local(&tz, in_gap, DstPolicy::ShiftForward).unwrap();
        let wall = shifted.with_timezone(&tz);
        assert_eq!((wall.hour(), wall.minute()), (3, 30));
    }

    #[test]
    fn ambiguous_time_resolves_to_earliest() {
        // 2026-11-01 01:30 happens twice in America/New_York (EDT then EST).
        let tz = chrono_tz::America::New_York;
        let resolved = resolve_local(&tz, local(2026, 11, 1, 1, 30), DstPolicy::Skip).unwrap();
        assert_eq!(resolved.naive_utc(), local(2026, 11, 1, 5, 30));
    }
}
