//! Turn weekly availability windows into concrete bookable slots.
//!
//! For each day of the booking horizon the windows declared for that weekday
//! are walked in fixed steps; every candidate that starts strictly after
//! `reference_now`, fits inside its window, and conflicts with no busy interval
//! becomes a slot.
//!
//! The generator never reads the clock. Identical inputs, including
//! `reference_now`, always yield an identical ordered result, which is what
//! makes [`crate::cache::SlotCache`] sound.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::conflict::ConflictDetector;
use crate::dst::resolve_local;
use crate::error::{EngineError, Result};
use crate::model::{AvailabilityWindow, BusyInterval, SlotCandidate, Weekday};
use crate::settings::EngineSettings;

/// No window spans more than one local day, and no local day is longer than
/// 25 hours, so longer meetings can never be offered.
const LONGEST_LOCAL_DAY_MINUTES: i64 = 25 * 60;

/// Whether a computation found anything to offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotOutcome {
    Available,
    /// Nothing bookable inside the horizon. A valid result, not an error.
    NoAvailability,
}

/// Result of one slot computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSchedule {
    /// Slots in non-decreasing start order.
    pub slots: Vec<SlotCandidate>,
    pub outcome: SlotOutcome,
}

impl SlotSchedule {
    fn from_slots(slots: Vec<SlotCandidate>) -> Self {
        let outcome = if slots.is_empty() {
            SlotOutcome::NoAvailability
        } else {
            SlotOutcome::Available
        };
        Self { slots, outcome }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
}

/// Slots sharing a calendar date in the engine's timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySlots {
    pub date: NaiveDate,
    pub slots: Vec<SlotCandidate>,
}

/// Every input of a slot computation, owned, so it can be stored and compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotRequest {
    pub windows: Vec<AvailabilityWindow>,
    pub busy: Vec<BusyInterval>,
    pub duration_minutes: i64,
    pub max_days_in_advance: i64,
    pub reference_now: DateTime<Utc>,
    pub settings: EngineSettings,
}

impl SlotRequest {
    pub fn generate(&self) -> Result<SlotSchedule> {
        generate_slots(
            &self.windows,
            &self.busy,
            self.duration_minutes,
            self.max_days_in_advance,
            self.reference_now,
            &self.settings,
        )
    }
}

/// Generate every offerable slot within the booking horizon.
///
/// Days run from `reference_now`'s date (in `settings.timezone`) through
/// `max_days_in_advance` days later, inclusive. Candidate starts advance by
/// `min(settings.max_step_minutes, duration_minutes)`.
///
/// # Errors
/// Returns `EngineError::InvalidInput` if `duration_minutes <= 0`,
/// `max_days_in_advance` is negative or beyond `settings.max_horizon_days`,
/// or the settings are unusable. No slots are produced in that case.
pub fn generate_slots(
    windows: &[AvailabilityWindow],
    busy: &[BusyInterval],
    duration_minutes: i64,
    max_days_in_advance: i64,
    reference_now: DateTime<Utc>,
    settings: &EngineSettings,
) -> Result<SlotSchedule> {
    if duration_minutes <= 0 {
        return Err(EngineError::InvalidInput(format!(
            "duration_minutes must be positive, got {}",
            duration_minutes
        )));
    }
    if max_days_in_advance < 0 {
        return Err(EngineError::InvalidInput(format!(
            "max_days_in_advance must not be negative, got {}",
            max_days_in_advance
        )));
    }
    settings.validate()?;
    if max_days_in_advance > settings.max_horizon_days {
        return Err(EngineError::InvalidInput(format!(
            "max_days_in_advance must be at most {}, got {}",
            settings.max_horizon_days, max_days_in_advance
        )));
    }
    if duration_minutes > LONGEST_LOCAL_DAY_MINUTES {
        debug!(duration_minutes, "meeting is longer than any window");
        return Ok(SlotSchedule::from_slots(Vec::new()));
    }

    let tz = settings.timezone;
    let duration = Duration::minutes(duration_minutes);
    let step = Duration::minutes(duration_minutes.min(settings.max_step_minutes));
    let detector = ConflictDetector::new(settings.scheduled_meeting_rule, tz);

    // Windows within a day are walked by start time so the output stays ordered.
    let mut ordered: Vec<&AvailabilityWindow> = windows.iter().collect();
    ordered.sort_by_key(|w| (w.start_time, w.end_time));

    let first_day = reference_now.with_timezone(&tz).date_naive();
    let mut slots = Vec::new();
    let mut days_scanned = 0usize;

    for offset in 0..=max_days_in_advance.unsigned_abs() {
        let Some(day) = first_day.checked_add_days(Days::new(offset)) else {
            break;
        };
        days_scanned += 1;
        let weekday = Weekday::from(day.weekday());

        let mut day_slots = Vec::new();
        for window in ordered.iter().filter(|w| w.weekday == weekday) {
            collect_window(
                window,
                day,
                &tz,
                settings,
                duration,
                step,
                reference_now,
                busy,
                &detector,
                &mut day_slots,
            );
        }

        // Only unvalidated, overlapping windows can break the ordering or
        // produce the same slot twice.
        day_slots.sort();
        day_slots.dedup();
        slots.extend(day_slots);
    }

    debug!(
        days_scanned,
        windows = windows.len(),
        busy = busy.len(),
        slots = slots.len(),
        "generated slots"
    );

    Ok(SlotSchedule::from_slots(slots))
}

#[allow(clippy::too_many_arguments)]
fn collect_window(
    window: &AvailabilityWindow,
    day: NaiveDate,
    tz: &Tz,
    settings: &EngineSettings,
    duration: Duration,
    step: Duration,
    reference_now: DateTime<Utc>,
    busy: &[BusyInterval],
    detector: &ConflictDetector,
    out: &mut Vec<SlotCandidate>,
) {
    if !window.is_well_formed() {
        warn!(%window, "skipping window with zero or negative length");
        return;
    }

    let bounds = (
        resolve_local(tz, day.and_time(window.start_time), settings.dst_policy),
        resolve_local(tz, day.and_time(window.end_time), settings.dst_policy),
    );
    let (Some(window_start), Some(window_end)) = bounds else {
        debug!(%window, %day, "window boundary falls in a DST gap, skipping day");
        return;
    };

    let mut start = window_start;
    while let Some(end) = start.checked_add_signed(duration) {
        if end > window_end {
            break;
        }
        let candidate = SlotCandidate { start, end };
        if start <= reference_now {
            trace!(start = %candidate.start, "candidate is not in the future");
        } else if let Some(interval) = detector.first_conflict(&candidate, busy) {
            trace!(
                start = %candidate.start,
                busy_start = %interval.start,
                busy_end = %interval.end,
                "candidate conflicts with busy interval"
            );
        } else {
            out.push(candidate);
        }
        match start.checked_add_signed(step) {
            Some(next) => start = next,
            None => break,
        }
    }
}

/// Group ordered slots by their calendar date in `tz`, preserving order.
pub fn group_by_date(slots: &[SlotCandidate], tz: Tz) -> Vec<DaySlots> {
    let mut days: Vec<DaySlots> = Vec::new();

    for slot in slots {
        let date = slot.start.with_timezone(&tz).date_naive();
        match days.last_mut() {
            Some(last) if last.date == date => last.slots.push(*slot),
            _ => days.push(DaySlots {
                date,
                slots: vec![*slot],
            }),
        }
    }

    days
}
