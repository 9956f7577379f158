//! Keep an advisor's recurring availability windows free of overlaps.
//!
//! Two windows overlap when they share a weekday and their half-open
//! `[start_time, end_time)` ranges intersect. Windows that merely touch
//! (`a.end_time == b.start_time`) are allowed.

use chrono::NaiveTime;
use tracing::debug;

use crate::error::{Result, ValidationError};
use crate::model::{AvailabilityWindow, Weekday};

/// Fallback times tried on a day that already has windows, in order.
const FALLBACK_RANGES: [((u32, u32), (u32, u32)); 3] =
    [((18, 0), (22, 0)), ((13, 0), (17, 0)), ((9, 0), (12, 0))];

pub fn overlaps(a: &AvailabilityWindow, b: &AvailabilityWindow) -> bool {
    a.weekday == b.weekday && a.start_time < b.end_time && a.end_time > b.start_time
}

pub fn has_overlap(candidate: &AvailabilityWindow, existing: &[AvailabilityWindow]) -> bool {
    find_overlap(candidate, existing).is_some()
}

/// The first window in `existing` that `candidate` overlaps.
pub fn find_overlap<'a>(
    candidate: &AvailabilityWindow,
    existing: &'a [AvailabilityWindow],
) -> Option<&'a AvailabilityWindow> {
    existing.iter().find(|window| overlaps(candidate, window))
}

fn ensure_well_formed(window: &AvailabilityWindow) -> Result<()> {
    if !window.is_well_formed() {
        return Err(ValidationError::Malformed {
            window: window.clone(),
        }
        .into());
    }
    Ok(())
}

/// Validate a window about to be created.
pub fn validate_new(candidate: &AvailabilityWindow, existing: &[AvailabilityWindow]) -> Result<()> {
    ensure_well_formed(candidate)?;
    if let Some(conflicting) = find_overlap(candidate, existing) {
        debug!(%candidate, %conflicting, "rejecting overlapping window");
        return Err(ValidationError::Overlap {
            candidate: candidate.clone(),
            conflicting: conflicting.clone(),
        }
        .into());
    }
    Ok(())
}

/// Validate an edit of a persisted window.
///
/// The stored copy of the window (same `id`) is excluded from `existing`, so a
/// window never conflicts with its own previous version. A window without an id
/// has no stored copy and is validated like a new one.
pub fn validate_edit(edited: &AvailabilityWindow, existing: &[AvailabilityWindow]) -> Result<()> {
    let Some(id) = edited.id.as_deref() else {
        return validate_new(edited, existing);
    };
    let others: Vec<AvailabilityWindow> = existing
        .iter()
        .filter(|window| window.id.as_deref() != Some(id))
        .cloned()
        .collect();
    validate_new(edited, &others)
}

/// Validate a whole batch, e.g. everything an advisor saves at once.
///
/// Reports the first malformed window, or the first overlapping pair in input order.
pub fn validate_set(windows: &[AvailabilityWindow]) -> Result<()> {
    for (i, window) in windows.iter().enumerate() {
        validate_new(window, &windows[..i])?;
    }
    Ok(())
}

/// Propose a new window that does not overlap `existing`.
///
/// Starts from Monday 09:00-17:00. If Monday already has windows, moves to the
/// first weekday without any; if that still overlaps, tries a few common ranges
/// on the same day, then the following weekday. Returns `None` when the final
/// proposal still overlaps and the advisor has to place the window by hand.
pub fn suggest_window(existing: &[AvailabilityWindow]) -> Option<AvailabilityWindow> {
    let mut proposal = AvailabilityWindow::new(Weekday::Monday, hm(9, 0), hm(17, 0));

    if existing.iter().any(|w| w.weekday == proposal.weekday) {
        if let Some(free_day) = Weekday::ALL
            .into_iter()
            .find(|day| existing.iter().all(|w| w.weekday != *day))
        {
            proposal.weekday = free_day;
        }

        if has_overlap(&proposal, existing) {
            let fallback = FALLBACK_RANGES.iter().find_map(|&((sh, sm), (eh, em))| {
                let attempt = AvailabilityWindow::new(proposal.weekday, hm(sh, sm), hm(eh, em));
                (!has_overlap(&attempt, existing)).then_some(attempt)
            });
            match fallback {
                Some(window) => proposal = window,
                None => proposal.weekday = proposal.weekday.succ(),
            }
        }
    }

    if has_overlap(&proposal, existing) {
        debug!(%proposal, "no non-overlapping window could be suggested");
        return None;
    }
    Some(proposal)
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}
