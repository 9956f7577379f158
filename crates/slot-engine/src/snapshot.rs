//! Ingest the loosely-typed records delivered by the availability, calendar
//! and link stores.
//!
//! Store records may lack fields or carry values that do not parse. Such a
//! record is skipped and reported as a [`DataError`]; the rest of the snapshot
//! is still used. Only a document that is not JSON at all is fatal.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dst::resolve_local;
use crate::error::{DataError, Result};
use crate::generator::SlotRequest;
use crate::model::{
    parse_hhmm, AvailabilityWindow, BusyInterval, BusySource, SchedulingLinkConfig, Weekday,
};
use crate::settings::EngineSettings;

const WINDOW: &str = "availability window";
const INTERVAL: &str = "busy interval";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAvailabilityWindow {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    pub weekday: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBusyInterval {
    #[serde(alias = "start")]
    pub start_time: Option<String>,
    #[serde(alias = "end")]
    pub end_time: Option<String>,
    /// Absent source means an ordinary calendar event.
    pub source: Option<String>,
}

/// Link fields as stored; absent values fall back to [`LinkDefaults`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLinkConfig {
    pub meeting_length: Option<i64>,
    pub max_days_in_advance: Option<i64>,
    #[serde(default)]
    pub custom_questions: Vec<String>,
}

/// Values used when a link leaves meeting length or horizon unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkDefaults {
    pub meeting_length: i64,
    pub max_days_in_advance: i64,
}

impl Default for LinkDefaults {
    fn default() -> Self {
        Self {
            meeting_length: SchedulingLinkConfig::DEFAULT_MEETING_LENGTH,
            max_days_in_advance: SchedulingLinkConfig::DEFAULT_MAX_DAYS_IN_ADVANCE,
        }
    }
}

impl RawLinkConfig {
    pub fn resolve(&self, defaults: &LinkDefaults) -> SchedulingLinkConfig {
        SchedulingLinkConfig {
            meeting_length: self.meeting_length.unwrap_or(defaults.meeting_length),
            max_days_in_advance: self
                .max_days_in_advance
                .unwrap_or(defaults.max_days_in_advance),
            custom_questions: self.custom_questions.clone(),
        }
    }
}

/// The document a visitor page load fetches: windows, busy time, link config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSnapshot {
    #[serde(default)]
    pub availability: Vec<RawAvailabilityWindow>,
    #[serde(default)]
    pub events: Vec<RawBusyInterval>,
    #[serde(default)]
    pub link: Option<RawLinkConfig>,
}

/// A typed snapshot plus the records that had to be skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub windows: Vec<AvailabilityWindow>,
    pub busy: Vec<BusyInterval>,
    pub link: SchedulingLinkConfig,
    pub skipped: Vec<DataError>,
}

impl Snapshot {
    /// Parse a snapshot document. Naive timestamps are read in `settings.timezone`.
    pub fn from_json(json: &str, settings: &EngineSettings, defaults: &LinkDefaults) -> Result<Self> {
        let raw: RawSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_raw(&raw, settings, defaults))
    }

    pub fn from_raw(raw: &RawSnapshot, settings: &EngineSettings, defaults: &LinkDefaults) -> Self {
        let mut skipped = Vec::new();

        let windows = raw
            .availability
            .iter()
            .enumerate()
            .filter_map(|(index, record)| keep(convert_window(index, record), &mut skipped))
            .collect();

        let busy = raw
            .events
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                keep(convert_interval(index, record, settings), &mut skipped)
            })
            .collect();

        let link = raw
            .link
            .as_ref()
            .map(|link| link.resolve(defaults))
            .unwrap_or_else(|| RawLinkConfig::default().resolve(defaults));

        Snapshot {
            windows,
            busy,
            link,
            skipped,
        }
    }

    /// A generator request for this snapshot under its own link configuration.
    pub fn request(&self, reference_now: DateTime<Utc>, settings: &EngineSettings) -> SlotRequest {
        SlotRequest {
            windows: self.windows.clone(),
            busy: self.busy.clone(),
            duration_minutes: self.link.meeting_length,
            max_days_in_advance: self.link.max_days_in_advance,
            reference_now,
            settings: *settings,
        }
    }
}

fn keep<T>(converted: std::result::Result<T, DataError>, skipped: &mut Vec<DataError>) -> Option<T> {
    match converted {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(error = %err, "skipping snapshot record");
            skipped.push(err);
            None
        }
    }
}

fn required<'a>(
    value: &'a Option<String>,
    entity: &'static str,
    index: usize,
    field: &'static str,
) -> std::result::Result<&'a str, DataError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DataError::MissingField {
            entity,
            index,
            field,
        }),
    }
}

fn invalid(entity: &'static str, index: usize, field: &'static str, value: &str) -> DataError {
    DataError::InvalidField {
        entity,
        index,
        field,
        value: value.to_string(),
    }
}

fn convert_window(
    index: usize,
    raw: &RawAvailabilityWindow,
) -> std::result::Result<AvailabilityWindow, DataError> {
    let weekday = required(&raw.weekday, WINDOW, index, "weekday")?;
    let start = required(&raw.start_time, WINDOW, index, "start_time")?;
    let end = required(&raw.end_time, WINDOW, index, "end_time")?;

    let weekday: Weekday = weekday
        .parse()
        .map_err(|_| invalid(WINDOW, index, "weekday", weekday))?;
    let start_time = parse_hhmm(start).ok_or_else(|| invalid(WINDOW, index, "start_time", start))?;
    let end_time = parse_hhmm(end).ok_or_else(|| invalid(WINDOW, index, "end_time", end))?;

    let window = AvailabilityWindow {
        id: raw.id.clone(),
        weekday,
        start_time,
        end_time,
    };
    if !window.is_well_formed() {
        return Err(DataError::Inverted {
            entity: WINDOW,
            index,
        });
    }
    Ok(window)
}

fn convert_interval(
    index: usize,
    raw: &RawBusyInterval,
    settings: &EngineSettings,
) -> std::result::Result<BusyInterval, DataError> {
    let start_raw = required(&raw.start_time, INTERVAL, index, "start_time")?;
    let end_raw = required(&raw.end_time, INTERVAL, index, "end_time")?;

    let start = parse_timestamp(start_raw, settings)
        .ok_or_else(|| invalid(INTERVAL, index, "start_time", start_raw))?;
    let end = parse_timestamp(end_raw, settings)
        .ok_or_else(|| invalid(INTERVAL, index, "end_time", end_raw))?;
    if end < start {
        return Err(DataError::Inverted {
            entity: INTERVAL,
            index,
        });
    }

    let source = match raw.source.as_deref() {
        None => BusySource::default(),
        Some(s) => s
            .parse()
            .map_err(|_| invalid(INTERVAL, index, "source", s))?,
    };

    Ok(BusyInterval { start, end, source })
}

/// Parse an RFC 3339 timestamp, or a naive one read as wall-clock time in
/// `settings.timezone`.
pub fn parse_timestamp(s: &str, settings: &EngineSettings) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .ok()?;
    resolve_local(&settings.timezone, naive, settings.dst_policy)
}
