//! CLI configuration.
//!
//! Settings live in `config.toml` under `~/.config/slot-engine/` by default:
//!
//! ```toml
//! [engine]
//! timezone = "America/New_York"
//! dst_policy = "shift_forward"
//! scheduled_meeting_rule = "overlap_only"
//! max_step_minutes = 30
//! max_horizon_days = 365
//!
//! [defaults]
//! meeting_length = 30
//! max_days_in_advance = 14
//! ```
//!
//! Every key is optional. Command-line flags override the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use slot_engine::snapshot::LinkDefaults;
use slot_engine::EngineSettings;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Timezone, DST and conflict-rule settings passed to the engine.
    pub engine: EngineSettings,
    /// Used when a snapshot's link leaves meeting length or horizon unset.
    pub defaults: LinkDefaults,
}

impl CliConfig {
    /// Load from the default path, or fall back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("slot-engine")
            .join("config.toml")
    }
}
