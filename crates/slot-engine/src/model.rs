//! Core data types shared by the validator, the generator, and the booking builder.
//!
//! Wall-clock window boundaries are `NaiveTime` and travel as `"HH:MM"`.
//! Absolute instants (busy intervals, slots) are `DateTime<Utc>` and travel as
//! RFC 3339 strings.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Day of the week an availability window recurs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    /// The following day, wrapping Sunday back to Monday.
    pub fn succ(self) -> Weekday {
        Weekday::from(chrono::Weekday::from(self).succ())
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = EngineError;

    /// Case-insensitive: stores have been seen to send `"Monday"` as well as `"monday"`.
    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str() == lowered)
            .ok_or_else(|| EngineError::InvalidInput(format!("unknown weekday '{}'", s)))
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl From<Weekday> for chrono::Weekday {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
            Weekday::Saturday => chrono::Weekday::Sat,
            Weekday::Sunday => chrono::Weekday::Sun,
        }
    }
}

/// Parse a wall-clock `HH:MM` (or `HH:MM:SS`) string.
pub fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// Serde adapter for `NaiveTime` as `"HH:MM"`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw)
            .ok_or_else(|| de::Error::custom(format!("expected HH:MM, got '{}'", raw)))
    }
}

/// A recurring weekly interval during which the advisor is bookable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    /// Store-assigned identifier; absent for windows not yet persisted.
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub weekday: Weekday,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

impl AvailabilityWindow {
    pub fn new(weekday: Weekday, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            id: None,
            weekday,
            start_time,
            end_time,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// `start_time < end_time`. Zero-length windows are not well-formed.
    pub fn is_well_formed(&self) -> bool {
        self.start_time < self.end_time
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

impl fmt::Display for AvailabilityWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.weekday,
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )?;
        if let Some(id) = &self.id {
            write!(f, " ({})", id)?;
        }
        Ok(())
    }
}

/// Where a busy interval came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusySource {
    /// An event on one of the advisor's connected calendars.
    #[default]
    #[serde(alias = "calendar_events")]
    ExternalCalendar,
    /// A meeting previously booked through a scheduling link.
    #[serde(alias = "scheduled_events")]
    ScheduledMeeting,
}

impl FromStr for BusySource {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "external_calendar" | "calendar_events" => Ok(BusySource::ExternalCalendar),
            "scheduled_meeting" | "scheduled_events" => Ok(BusySource::ScheduledMeeting),
            other => Err(EngineError::InvalidInput(format!(
                "unknown busy interval source '{}'",
                other
            ))),
        }
    }
}

/// A block of already-committed time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub source: BusySource,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, source: BusySource) -> Self {
        Self { start, end, source }
    }
}

/// A bookable interval of exactly the configured meeting length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotCandidate {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SlotCandidate {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// The constraints a scheduling link places on the slots it offers.
///
/// Usage caps and expiration are enforced by the link store before the engine
/// is ever invoked, so they are not represented here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingLinkConfig {
    pub meeting_length: i64,
    pub max_days_in_advance: i64,
    #[serde(default)]
    pub custom_questions: Vec<String>,
}

impl SchedulingLinkConfig {
    pub const DEFAULT_MEETING_LENGTH: i64 = 30;
    pub const DEFAULT_MAX_DAYS_IN_ADVANCE: i64 = 14;

    /// Reject a meeting length that is not positive or a negative horizon.
    pub fn validate(&self) -> Result<()> {
        if self.meeting_length <= 0 {
            return Err(EngineError::InvalidInput(format!(
                "meeting length must be positive, got {}",
                self.meeting_length
            )));
        }
        if self.max_days_in_advance < 0 {
            return Err(EngineError::InvalidInput(format!(
                "max days in advance must not be negative, got {}",
                self.max_days_in_advance
            )));
        }
        Ok(())
    }
}

impl Default for SchedulingLinkConfig {
    fn default() -> Self {
        Self {
            meeting_length: Self::DEFAULT_MEETING_LENGTH,
            max_days_in_advance: Self::DEFAULT_MAX_DAYS_IN_ADVANCE,
            custom_questions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_parses_case_insensitively() {
        assert_eq!("Monday".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!(" sunday ".parse::<Weekday>().unwrap(), Weekday::Sunday);
        assert!("mon".parse::<Weekday>().is_err());
    }

    #[test]
    fn weekday_succ_wraps() {
        assert_eq!(Weekday::Sunday.succ(), Weekday::Monday);
        assert_eq!(Weekday::Monday.succ(), Weekday::Tuesday);
    }

    #[test]
    fn window_serializes_as_hhmm() {
        let window = AvailabilityWindow::new(
            Weekday::Friday,
            NaiveTime::from_hms_opt(9, 5, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        );
        let json = serde_json::to_string(&window).unwrap();
        assert_eq!(
            json,
            r#"{"weekday":"friday","start_time":"09:05","end_time":"17:00"}"#
        );
    }

    #[test]
    fn window_accepts_mongo_style_id_and_seconds() {
        let json = r#"{"_id":"w1","weekday":"monday","start_time":"09:00:00","end_time":"10:30"}"#;
        let window: AvailabilityWindow = serde_json::from_str(json).unwrap();
        assert_eq!(window.id.as_deref(), Some("w1"));
        assert_eq!(window.duration_minutes(), 90);
    }

    #[test]
    fn legacy_source_names_are_accepted() {
        let json = r#"{"start":"2026-03-16T09:00:00Z","end":"2026-03-16T10:00:00Z","source":"scheduled_events"}"#;
        let interval: BusyInterval = serde_json::from_str(json).unwrap();
        assert_eq!(interval.source, BusySource::ScheduledMeeting);
        assert_eq!(
            "calendar_events".parse::<BusySource>().unwrap(),
            BusySource::ExternalCalendar
        );
    }

    #[test]
    fn link_config_rejects_bad_numbers() {
        let mut link = SchedulingLinkConfig::default();
        assert!(link.validate().is_ok());
        link.meeting_length = 0;
        assert!(link.validate().is_err());
        link.meeting_length = 30;
        link.max_days_in_advance = -1;
        assert!(link.validate().is_err());
    }
}
