//! Engine-wide settings that are not part of a scheduling link.

pub use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::conflict::ScheduledMeetingRule;
use crate::dst::DstPolicy;
use crate::error::{EngineError, Result};

/// Largest gap between consecutive candidate starts, in minutes.
pub const DEFAULT_MAX_STEP_MINUTES: i64 = 30;

/// Furthest a booking horizon may reach, in days past the reference date.
pub const DEFAULT_MAX_HORIZON_DAYS: i64 = 365;

/// How the engine interprets wall-clock data and busy intervals.
///
/// Deserializes from a partial table; missing keys take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Timezone the advisor's windows are declared in.
    pub timezone: Tz,
    pub dst_policy: DstPolicy,
    pub scheduled_meeting_rule: ScheduledMeetingRule,
    /// Candidate starts advance by `min(max_step_minutes, meeting length)`.
    pub max_step_minutes: i64,
    /// Requests with a larger `max_days_in_advance` are rejected.
    pub max_horizon_days: i64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            dst_policy: DstPolicy::default(),
            scheduled_meeting_rule: ScheduledMeetingRule::default(),
            max_step_minutes: DEFAULT_MAX_STEP_MINUTES,
            max_horizon_days: DEFAULT_MAX_HORIZON_DAYS,
        }
    }
}

impl EngineSettings {
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_step_minutes <= 0 {
            return Err(EngineError::InvalidInput(format!(
                "max_step_minutes must be positive, got {}",
                self.max_step_minutes
            )));
        }
        if self.max_horizon_days < 0 {
            return Err(EngineError::InvalidInput(format!(
                "max_horizon_days must not be negative, got {}",
                self.max_horizon_days
            )));
        }
        Ok(())
    }
}

/// Parse an IANA timezone name (e.g. "America/Los_Angeles").
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| EngineError::InvalidTimezone(name.to_string()))
}
